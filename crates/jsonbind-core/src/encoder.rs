//! Encoder: turns typed values into JSON text.
//!
//! Native values are first projected onto [`Value`] through [`ToJson`], then
//! written with a fixed, spaced layout:
//!
//! - Objects: `{ "f1": v1, "f2": v2 }`, empty as `{ }`
//! - Sequences: `[ e1, e2 ]`, empty as `[ ]`
//! - Maps: `[ { "k1": v1 }, { "k2": v2 } ]`, one single-entry object per entry
//! - Bytes: standard base64 in quotes
//!
//! Text that is already an object (`{...}`) is written verbatim, which lets a
//! caller embed pre-rendered JSON in a `String` field. Other text is quoted
//! without escaping, so a `"` inside a string produces text this crate cannot
//! read back.
//!
//! # Example
//! ```
//! use jsonbind_core::to_json_string;
//!
//! assert_eq!(to_json_string(&vec![1, 2, 3]), "[ 1, 2, 3 ]");
//! assert_eq!(to_json_string(&vec![1u8, 2, 3]), "\"AQID\"");
//! assert_eq!(to_json_string(&Some("hi")), "\"hi\"");
//! ```

use crate::fragment::is_json_object;
use crate::metadata::{descriptor, JsonEnum, JsonObject};
use crate::value::{Number, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Projection of a native value onto the intermediate [`Value`].
pub trait ToJson {
    fn to_value(&self) -> Value;

    /// Project a slice of `Self`. Overridden by `u8` so byte sequences become
    /// [`Value::Bytes`].
    #[doc(hidden)]
    fn sequence_to_value(items: &[Self]) -> Value
    where
        Self: Sized,
    {
        Value::Sequence(items.iter().map(ToJson::to_value).collect())
    }
}

/// Encode any [`ToJson`] value as JSON text.
pub fn encode<T: ToJson + ?Sized>(value: &T) -> String {
    encode_value(&value.to_value())
}

/// Encode an intermediate [`Value`] as JSON text.
pub fn encode_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Project a registered object type onto [`Value::Object`], in descriptor field
/// order.
pub fn object_to_value<T: JsonObject>(obj: &T) -> Value {
    let fields = descriptor::<T>()
        .fields()
        .iter()
        .map(|field| (field.name().to_string(), field.read(obj)))
        .collect();
    Value::Object(fields)
}

/// Project an enum member onto its name.
pub fn enum_to_value<E: JsonEnum>(member: &E) -> Value {
    match member.member_name() {
        Some(name) => Value::Text(name.to_string()),
        None => Value::Null,
    }
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(n.as_str()),
        Value::Text(s) if is_json_object(s) => out.push_str(s),
        Value::Text(s) => write_quoted(s, out),
        Value::Bytes(bytes) => write_quoted(&STANDARD.encode(bytes), out),
        Value::Sequence(items) => {
            write_delimited(('[', ']'), items, out, |item, out| write_value(item, out));
        }
        Value::Mapping(entries) => {
            write_delimited(('[', ']'), entries, out, |(key, value), out| {
                out.push_str("{ ");
                write_quoted(&map_key_text(key), out);
                out.push_str(": ");
                write_value(value, out);
                out.push_str(" }");
            });
        }
        Value::Object(fields) => {
            write_delimited(('{', '}'), fields, out, |(name, value), out| {
                write_quoted(name, out);
                out.push_str(": ");
                write_value(value, out);
            });
        }
    }
}

/// `open item, item close` with single spaces inside the delimiters.
fn write_delimited<T>(
    (open, close): (char, char),
    items: &[T],
    out: &mut String,
    mut write_item: impl FnMut(&T, &mut String),
) {
    out.push(open);
    out.push(' ');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_item(item, out);
    }
    if !items.is_empty() {
        out.push(' ');
    }
    out.push(close);
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    out.push_str(s);
    out.push('"');
}

/// Map keys are written as raw text inside quotes.
fn map_key_text(key: &Value) -> Cow<'_, str> {
    match key {
        Value::Text(s) => Cow::Borrowed(s),
        Value::Number(n) => Cow::Borrowed(n.as_str()),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        other => Cow::Owned(encode_value(other)),
    }
}

macro_rules! to_json_integer {
    ($($ty:ty),*) => {
        $(
            impl ToJson for $ty {
                fn to_value(&self) -> Value {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

to_json_integer!(i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize);

impl ToJson for u8 {
    fn to_value(&self) -> Value {
        Value::Number(Number::from(*self))
    }

    fn sequence_to_value(items: &[Self]) -> Value {
        Value::Bytes(items.to_vec())
    }
}

impl ToJson for f32 {
    fn to_value(&self) -> Value {
        Number::from_f32(*self).map_or(Value::Null, Value::Number)
    }
}

impl ToJson for f64 {
    fn to_value(&self) -> Value {
        Number::from_f64(*self).map_or(Value::Null, Value::Number)
    }
}

impl ToJson for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToJson for char {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToJson for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToJson for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToJson for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::Text(self.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

impl ToJson for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToJson + ?Sized> ToJson for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_value(&self) -> Value {
        T::sequence_to_value(self)
    }
}

impl<T: ToJson, const N: usize> ToJson for [T; N] {
    fn to_value(&self) -> Value {
        T::sequence_to_value(self)
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_value(&self) -> Value {
        T::sequence_to_value(self)
    }
}

impl<K: ToJson, V: ToJson, S> ToJson for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(key, value)| (key.to_value(), value.to_value()))
                .collect(),
        )
    }
}

impl<K: ToJson, V: ToJson> ToJson for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(key, value)| (key.to_value(), value.to_value()))
                .collect(),
        )
    }
}
