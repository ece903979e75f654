//! Registration macros that wire user types into the conversion traits.

/// Implement [`FromJson`], [`ToJson`] and [`Describe`] for types that
/// implement [`JsonObject`].
///
/// Generic types list their parameters after `impl`; each parameter must itself
/// be convertible:
///
/// ```
/// use jsonbind_core::{json_object, Describe, FromJson, JsonObject, ToJson, TypeBuilder};
///
/// struct Tagged<T> {
///     tag: String,
///     value: Option<T>,
/// }
///
/// impl<T> JsonObject for Tagged<T>
/// where
///     T: FromJson + ToJson + Describe + Send + Sync + 'static,
/// {
///     fn allocate() -> Self {
///         Tagged { tag: String::new(), value: None }
///     }
///
///     fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
///         ty.public("tag", |t| &t.tag, |t| &mut t.tag)
///             .public("value", |t| &t.value, |t| &mut t.value)
///     }
/// }
///
/// json_object!(impl<T> Tagged<T>);
///
/// let t: Tagged<i64> = jsonbind_core::to_obj(r#"{ "tag": "n", "value": 7 }"#).unwrap();
/// assert_eq!(t.value, Some(7));
/// ```
///
/// [`FromJson`]: crate::FromJson
/// [`ToJson`]: crate::ToJson
/// [`Describe`]: crate::Describe
/// [`JsonObject`]: crate::JsonObject
#[macro_export]
macro_rules! json_object {
    (impl<$($param:ident),+ $(,)?> $ty:ty) => {
        impl<$($param),+> $crate::FromJson for $ty
        where
            $($param: $crate::FromJson + $crate::ToJson + $crate::Describe + Send + Sync + 'static),+
        {
            fn from_value(value: &$crate::Value) -> $crate::Result<Self> {
                $crate::decoder::decode_object(value)
            }
        }

        impl<$($param),+> $crate::ToJson for $ty
        where
            $($param: $crate::FromJson + $crate::ToJson + $crate::Describe + Send + Sync + 'static),+
        {
            fn to_value(&self) -> $crate::Value {
                $crate::encoder::object_to_value(self)
            }
        }

        impl<$($param),+> $crate::Describe for $ty
        where
            $($param: $crate::FromJson + $crate::ToJson + $crate::Describe + Send + Sync + 'static),+
        {
            fn shape() -> $crate::Shape {
                $crate::Shape::Object(::std::any::type_name::<$ty>())
            }
        }
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromJson for $ty {
                fn from_value(value: &$crate::Value) -> $crate::Result<Self> {
                    $crate::decoder::decode_object(value)
                }
            }

            impl $crate::ToJson for $ty {
                fn to_value(&self) -> $crate::Value {
                    $crate::encoder::object_to_value(self)
                }
            }

            impl $crate::Describe for $ty {
                fn shape() -> $crate::Shape {
                    $crate::Shape::Object(::std::any::type_name::<$ty>())
                }
            }
        )+
    };
}

/// Implement [`JsonEnum`] plus the conversion traits for a fieldless enum,
/// naming each member exactly as it appears in JSON.
///
/// ```
/// use jsonbind_core::json_enum;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// json_enum!(Color { Red, Green });
///
/// assert_eq!(jsonbind_core::to_json_string(&Color::Green), "\"Green\"");
/// let c: Color = jsonbind_core::to_obj("\"Red\"").unwrap();
/// assert_eq!(c, Color::Red);
/// ```
///
/// [`JsonEnum`]: crate::JsonEnum
#[macro_export]
macro_rules! json_enum {
    ($ty:ident { $($member:ident),+ $(,)? }) => {
        impl $crate::JsonEnum for $ty {
            const MEMBERS: &'static [(&'static str, Self)] =
                &[$((stringify!($member), $ty::$member)),+];
        }

        impl $crate::FromJson for $ty {
            fn from_value(value: &$crate::Value) -> $crate::Result<Self> {
                $crate::decoder::decode_enum(value)
            }
        }

        impl $crate::ToJson for $ty {
            fn to_value(&self) -> $crate::Value {
                $crate::encoder::enum_to_value(self)
            }
        }

        impl $crate::Describe for $ty {
            fn shape() -> $crate::Shape {
                $crate::Shape::Enum(::std::any::type_name::<$ty>())
            }
        }
    };
}
