//! Type Metadata Cache: per-type field tables, allocators and declared shapes.
//!
//! Rust has no runtime field reflection, so every object type registers its fields
//! once through a [`TypeBuilder`] in [`JsonObject::describe`]. Each field carries an
//! accessor (native field → [`Value`]) and a mutator ([`Value`] → native field)
//! built from plain field projections, which is how private fields get assigned
//! without exposing them.
//!
//! # Key design decisions
//!
//! - **Single-flight registry**: descriptors live in a process-wide map from
//!   `TypeId` to a leaked per-type `OnceLock`. The map lock is only held to find or
//!   insert the slot; the descriptor itself is built inside `OnceLock::get_or_init`,
//!   so concurrent first uses of one type build it exactly once, and building one
//!   type may look up another (see [`TypeBuilder::inherit`]).
//! - **Declared zero state**: [`JsonObject::allocate`] replaces constructor-free
//!   allocation. Decoding starts from that state and overwrites matched fields.
//! - **Static shapes**: a field's element/key/value types come from its declared
//!   Rust type via [`Describe`], so an empty `Vec<T>` still knows its `T`.

use crate::decoder::FromJson;
use crate::encoder::ToJson;
use crate::error::{JsonError, Result};
use crate::value::Value;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{OnceLock, PoisonError, RwLock};

/// Declared type of a field, standing in for generic-argument reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Bool,
    Integer,
    Float,
    Text,
    DateTime,
    Bytes,
    /// Untyped [`Value`].
    Any,
    Enum(&'static str),
    Object(&'static str),
    Optional(Box<Shape>),
    Sequence(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
}

impl Shape {
    /// Element, key/value or wrapped shapes of a container shape. Empty for
    /// everything else.
    pub fn generic_arguments(&self) -> Vec<Shape> {
        match self {
            Shape::Optional(inner) | Shape::Sequence(inner) => vec![(**inner).clone()],
            Shape::Map(key, value) => vec![(**key).clone(), (**value).clone()],
            _ => Vec::new(),
        }
    }
}

/// Static type description, implemented for every type that can be a field.
pub trait Describe {
    fn shape() -> Shape;

    /// Shape of `Vec<Self>`. Overridden by `u8` so byte vectors describe as
    /// [`Shape::Bytes`].
    #[doc(hidden)]
    fn sequence_shape() -> Shape
    where
        Self: Sized,
    {
        Shape::Sequence(Box::new(Self::shape()))
    }
}

/// A struct whose fields are bound by name.
///
/// ```
/// use jsonbind_core::{json_object, JsonObject, TypeBuilder};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl JsonObject for Point {
///     fn allocate() -> Self {
///         Point { x: 0, y: 0 }
///     }
///
///     fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
///         ty.public("x", |p| &p.x, |p| &mut p.x)
///             .public("y", |p| &p.y, |p| &mut p.y)
///     }
/// }
///
/// json_object!(Point);
///
/// let p: Point = jsonbind_core::to_obj(r#"{ "x": 3, "y": 4 }"#).unwrap();
/// assert_eq!(jsonbind_core::to_json_string(&p), r#"{ "x": 3, "y": 4 }"#);
/// ```
pub trait JsonObject: Sized + Send + Sync + 'static {
    /// The zero state decoding starts from. Fields with no matching JSON key keep
    /// the value given here.
    fn allocate() -> Self;

    /// Register the fields that take part in conversion.
    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self>;
}

/// An enum converted by member name.
pub trait JsonEnum: Sized + Clone + PartialEq + 'static {
    /// Every member with its exact, case-sensitive name.
    const MEMBERS: &'static [(&'static str, Self)];

    fn member_name(&self) -> Option<&'static str> {
        Self::MEMBERS
            .iter()
            .find(|(_, member)| member == self)
            .map(|(name, _)| *name)
    }

    fn from_member_name(name: &str) -> Option<Self> {
        Self::MEMBERS
            .iter()
            .find(|(member_name, _)| *member_name == name)
            .map(|(_, member)| member.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

type Reader<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
type Writer<T> = Box<dyn Fn(&mut T, &Value) -> Result<()> + Send + Sync>;

/// One registered field of `T`.
pub struct FieldDescriptor<T> {
    name: &'static str,
    visibility: Visibility,
    shape: Shape,
    generic_arguments: OnceLock<Vec<Shape>>,
    read: Reader<T>,
    write: Writer<T>,
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Memoized element/key/value shapes of a container field.
    pub fn generic_arguments(&self) -> &[Shape] {
        self.generic_arguments
            .get_or_init(|| self.shape.generic_arguments())
    }

    /// Project the field of `obj` into a [`Value`].
    pub fn read(&self, obj: &T) -> Value {
        (self.read)(obj)
    }

    /// Decode `value` against the field's declared type and assign it.
    /// On error the field is left untouched.
    pub fn assign(&self, obj: &mut T, value: &Value) -> Result<()> {
        (self.write)(obj, value)
    }
}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("shape", &self.shape)
            .finish()
    }
}

/// Cached metadata for one object type.
pub struct TypeDescriptor<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    index: HashMap<&'static str, usize>,
    allocate: fn() -> T,
}

impl<T> TypeDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Public fields first, then private ones, each name once.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Exact, case-sensitive field lookup.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn allocator(&self) -> fn() -> T {
        self.allocate
    }

    pub fn allocate(&self) -> T {
        (self.allocate)()
    }
}

/// Field registration for [`JsonObject::describe`].
pub struct TypeBuilder<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: JsonObject> TypeBuilder<T> {
    fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register a field that is part of the type's public surface.
    pub fn public<F>(self, name: &'static str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        F: FromJson + ToJson + Describe + 'static,
    {
        self.field(Visibility::Public, name, get, get_mut)
    }

    /// Register a field that is only reachable from inside the type's module.
    pub fn private<F>(self, name: &'static str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        F: FromJson + ToJson + Describe + 'static,
    {
        self.field(Visibility::Private, name, get, get_mut)
    }

    /// Expose the public fields of an embedded parent type as fields of `T`.
    pub fn inherit<P: JsonObject>(mut self, get: fn(&T) -> &P, get_mut: fn(&mut T) -> &mut P) -> Self {
        let parent = descriptor::<P>();
        for field in parent
            .fields()
            .iter()
            .filter(|f| f.visibility == Visibility::Public)
        {
            self.fields.push(FieldDescriptor {
                name: field.name,
                visibility: Visibility::Public,
                shape: field.shape.clone(),
                generic_arguments: OnceLock::new(),
                read: Box::new(move |obj: &T| field.read(get(obj))),
                write: Box::new(move |obj: &mut T, value: &Value| field.assign(get_mut(obj), value)),
            });
        }
        self
    }

    fn field<F>(
        mut self,
        visibility: Visibility,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self
    where
        F: FromJson + ToJson + Describe + 'static,
    {
        self.fields.push(FieldDescriptor {
            name,
            visibility,
            shape: F::shape(),
            generic_arguments: OnceLock::new(),
            read: Box::new(move |obj: &T| get(obj).to_value()),
            write: Box::new(move |obj: &mut T, value: &Value| {
                // Decode fully before touching the field.
                let decoded = F::from_value(value)?;
                *get_mut(obj) = decoded;
                Ok(())
            }),
        });
        self
    }

    fn build(self) -> TypeDescriptor<T> {
        let (public, private): (Vec<_>, Vec<_>) = self
            .fields
            .into_iter()
            .partition(|f| f.visibility == Visibility::Public);

        let mut fields = Vec::with_capacity(public.len() + private.len());
        let mut index = HashMap::new();
        for field in public.into_iter().chain(private) {
            if index.contains_key(field.name) {
                continue;
            }
            index.insert(field.name, fields.len());
            fields.push(field);
        }

        TypeDescriptor {
            name: std::any::type_name::<T>(),
            fields,
            index,
            allocate: T::allocate,
        }
    }
}

type Slot = OnceLock<Box<dyn Any + Send + Sync>>;

fn registry() -> &'static RwLock<HashMap<TypeId, &'static Slot>> {
    static REGISTRY: OnceLock<RwLock<HashMap<TypeId, &'static Slot>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

fn slot_for(type_id: TypeId) -> &'static Slot {
    let cached = registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
        .copied();
    if let Some(slot) = cached {
        return slot;
    }
    let mut map = registry().write().unwrap_or_else(PoisonError::into_inner);
    *map.entry(type_id)
        .or_insert_with(|| &*Box::leak(Box::new(Slot::new())))
}

/// The process-wide descriptor of `T`, built on first use.
///
/// # Panics
///
/// Panics if the registry hands back a descriptor of another type, which would
/// mean two types share a `TypeId`. Use [`try_descriptor`] to get an
/// [`JsonError::Access`] instead.
pub fn descriptor<T: JsonObject>() -> &'static TypeDescriptor<T> {
    match try_descriptor::<T>() {
        Ok(descriptor) => descriptor,
        Err(err) => panic!("{err}"),
    }
}

/// Fallible form of [`descriptor`].
pub fn try_descriptor<T: JsonObject>() -> Result<&'static TypeDescriptor<T>> {
    let slot = slot_for(TypeId::of::<T>());
    let erased = slot.get_or_init(|| {
        let descriptor = T::describe(TypeBuilder::new()).build();
        tracing::trace!(
            type_name = descriptor.name,
            fields = descriptor.fields.len(),
            "registered type descriptor"
        );
        Box::new(descriptor) as Box<dyn Any + Send + Sync>
    });
    erased.downcast_ref::<TypeDescriptor<T>>().ok_or_else(|| {
        JsonError::Access(format!(
            "type registry returned foreign metadata for {}",
            std::any::type_name::<T>()
        ))
    })
}

macro_rules! describe_as {
    ($shape:expr => $($ty:ty),*) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    $shape
                }
            }
        )*
    };
}

describe_as!(Shape::Bool => bool);
describe_as!(Shape::Integer => i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize);
describe_as!(Shape::Float => f32, f64);
describe_as!(Shape::Text => String, char);
describe_as!(Shape::DateTime => chrono::NaiveDateTime);
describe_as!(Shape::Any => Value);

impl Describe for u8 {
    fn shape() -> Shape {
        Shape::Integer
    }

    fn sequence_shape() -> Shape {
        Shape::Bytes
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        T::sequence_shape()
    }
}

impl<T: Describe> Describe for Box<[T]> {
    fn shape() -> Shape {
        T::sequence_shape()
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> Shape {
        T::sequence_shape()
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map(Box::new(K::shape()), Box::new(V::shape()))
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(Box::new(K::shape()), Box::new(V::shape()))
    }
}
