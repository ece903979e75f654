//! Decoder: turns JSON text into typed values.
//!
//! Decoding is two passes:
//!
//! 1. [`parse`] walks the text with the element splitter and the fragment
//!    classifier and builds an untyped [`Value`] tree. It never fails: object
//!    elements without a key separator are dropped, and unrecognized bare
//!    literals become text.
//! 2. [`FromJson::from_value`] projects that tree onto the target type. This is
//!    where the target type directs the conversion: the same `"79"` becomes a
//!    number for an `i32` field and stays text for a `String` field, and the same
//!    quoted string is base64 for `Vec<u8>`.
//!
//! # Key design decisions
//!
//! - **Lenient objects**: inside [`decode_object`], a field whose value fails to
//!   decode is left as allocated. One malformed field never aborts the object.
//!   Only [`JsonError::Access`] escapes.
//! - **Maps are arrays**: a map is read from `[ { "k": v }, ... ]`, one entry per
//!   single-entry object. A native JSON object is not accepted as a map.
//! - **No unescaping**: quoted text is taken verbatim between the quotes, and
//!   trimmed. A backslash is ordinary text.
//! - **Bare keys**: an unquoted key such as `{ Value: 1 }` is taken as written
//!   and binds to the field of that exact name.
//! - **Containers into text**: a `String` target receives an object or array
//!   value re-encoded as JSON text.

use crate::encoder::encode_value;
use crate::error::{JsonError, Result};
use crate::fragment::{Fragment, FragmentKind};
use crate::metadata::{try_descriptor, JsonEnum, JsonObject};
use crate::splitter::{split_elements, split_key_value};
use crate::value::{Number, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

/// Conversion from the intermediate [`Value`] into a native type.
pub trait FromJson: Sized {
    fn from_value(value: &Value) -> Result<Self>;

    /// Decode a `Vec<Self>`. Overridden by `u8` to accept base64 text.
    #[doc(hidden)]
    fn sequence_from_value(value: &Value) -> Result<Vec<Self>> {
        decode_sequence(value)
    }
}

/// Decode JSON text into `T`.
///
/// Fails with [`JsonError::InvalidInput`] on blank text; otherwise any error from
/// the projection is returned as is.
pub fn decode<T: FromJson>(text: &str) -> Result<T> {
    if text.trim().is_empty() {
        return Err(JsonError::InvalidInput("empty JSON text".to_string()));
    }
    T::from_value(&parse(text))
}

/// Parse JSON text into an untyped [`Value`] without any target type.
pub fn parse(text: &str) -> Value {
    let fragment = Fragment::new(text);
    match fragment.kind() {
        FragmentKind::Object => Value::Object(parse_entries(fragment.inner())),
        FragmentKind::Array => Value::Sequence(
            split_elements(fragment.inner())
                .into_iter()
                .map(parse)
                .collect(),
        ),
        FragmentKind::QuotedString => Value::Text(fragment.inner().to_string()),
        FragmentKind::Literal => parse_literal(fragment.as_str()),
    }
}

fn parse_entries(body: &str) -> Vec<(String, Value)> {
    split_elements(body)
        .into_iter()
        .filter_map(|element| match split_key_value(element) {
            Some((key, value)) => Some((unquote(key).to_string(), parse(value))),
            None => {
                tracing::trace!(element, "dropping object element without key separator");
                None
            }
        })
        .collect()
}

/// Remove the quotes around a quoted fragment; anything else is returned trimmed.
pub fn unquote(text: &str) -> &str {
    let fragment = Fragment::new(text);
    match fragment.kind() {
        FragmentKind::QuotedString => fragment.inner(),
        _ => fragment.as_str(),
    }
}

fn parse_literal(literal: &str) -> Value {
    match literal {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match Number::from_literal(literal) {
            Some(number) => Value::Number(number),
            None => Value::Text(literal.to_string()),
        },
    }
}

/// Build an object type from a [`Value::Object`].
///
/// The instance starts from [`JsonObject::allocate`]; every entry whose key
/// matches a registered field exactly is decoded against that field's type and
/// assigned. Fails with [`JsonError::Structural`] when the object is empty or when
/// no key matches any field.
pub fn decode_object<T: JsonObject>(value: &Value) -> Result<T> {
    let descriptor = try_descriptor::<T>()?;
    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            return Err(JsonError::Structural(format!(
                "expected object for {}, found {}",
                descriptor.name(),
                other.kind_name()
            )))
        }
    };
    if entries.is_empty() {
        return Err(JsonError::Structural(
            "JSON object contains no elements".to_string(),
        ));
    }

    let matched: Vec<_> = entries
        .iter()
        .filter_map(|(key, value)| descriptor.field(key).map(|field| (field, value)))
        .collect();
    if matched.is_empty() {
        return Err(JsonError::Structural(format!(
            "no JSON elements match type {}",
            descriptor.name()
        )));
    }

    let mut obj = descriptor.allocate();
    for (field, value) in matched {
        if let Err(err) = field.assign(&mut obj, value) {
            if !err.is_recoverable() {
                return Err(err);
            }
            tracing::debug!(
                type_name = descriptor.name(),
                field = field.name(),
                error = %err,
                "leaving field unset after decode failure"
            );
        }
    }
    Ok(obj)
}

/// Look up an enum member by its exact name.
pub fn decode_enum<E: JsonEnum>(value: &Value) -> Result<E> {
    let name = match value {
        Value::Text(s) => s.as_str(),
        Value::Number(n) => n.as_str(),
        Value::Bool(true) => "true",
        Value::Bool(false) => "false",
        other => other.kind_name(),
    };
    E::from_member_name(name).ok_or_else(|| JsonError::Name {
        type_name: std::any::type_name::<E>(),
        name: name.to_string(),
    })
}

/// Decode every element of a [`Value::Sequence`], preserving order.
pub fn decode_sequence<T: FromJson>(value: &Value) -> Result<Vec<T>> {
    match value {
        Value::Sequence(items) => items.iter().map(T::from_value).collect(),
        other => Err(JsonError::Structural(format!(
            "expected array, found {}",
            other.kind_name()
        ))),
    }
}

/// Decode the array-of-single-entry-objects map convention into key/value pairs.
pub fn decode_map_entries<K: FromJson, V: FromJson>(value: &Value) -> Result<Vec<(K, V)>> {
    match value {
        Value::Sequence(items) => items.iter().map(decode_map_entry::<K, V>).collect(),
        Value::Mapping(entries) => entries
            .iter()
            .map(|(key, value)| -> Result<(K, V)> {
                Ok((K::from_value(key)?, V::from_value(value)?))
            })
            .collect(),
        other => Err(JsonError::Structural(format!(
            "expected array of single-entry objects for map, found {}",
            other.kind_name()
        ))),
    }
}

fn decode_map_entry<K: FromJson, V: FromJson>(item: &Value) -> Result<(K, V)> {
    match item {
        Value::Object(entries) if entries.len() == 1 => {
            let (key, value) = &entries[0];
            Ok((K::from_value(&Value::Text(key.clone()))?, V::from_value(value)?))
        }
        Value::Object(entries) => Err(JsonError::Structural(format!(
            "map entry must have exactly one element, found {}",
            entries.len()
        ))),
        other => Err(JsonError::Structural(format!(
            "map entry must be an object, found {}",
            other.kind_name()
        ))),
    }
}

/// Text of a scalar value; quoted numbers and booleans are accepted.
fn scalar_text<'a>(value: &'a Value, kind: &'static str) -> Result<&'a str> {
    match value {
        Value::Number(n) => Ok(n.as_str()),
        Value::Text(s) => Ok(s.trim()),
        Value::Bool(true) => Ok("true"),
        Value::Bool(false) => Ok("false"),
        Value::Null => Err(JsonError::parse(kind, "null")),
        other => Err(JsonError::parse(kind, format!("<{}>", other.kind_name()))),
    }
}

fn parse_scalar<T: FromStr>(value: &Value, kind: &'static str) -> Result<T> {
    let text = scalar_text(value, kind)?;
    text.parse().map_err(|_| JsonError::parse(kind, text))
}

macro_rules! from_json_via_parse {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl FromJson for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    parse_scalar(value, $kind)
                }
            }
        )*
    };
}

from_json_via_parse!(
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    char => "char",
);

impl FromJson for u8 {
    fn from_value(value: &Value) -> Result<Self> {
        parse_scalar(value, "u8")
    }

    fn sequence_from_value(value: &Value) -> Result<Vec<Self>> {
        match value {
            Value::Text(text) => STANDARD
                .decode(text.as_bytes())
                .map_err(|_| JsonError::parse("base64 bytes", text.as_str())),
            Value::Bytes(bytes) => Ok(bytes.clone()),
            _ => decode_sequence(value),
        }
    }
}

impl FromJson for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.as_str().to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Object(_) | Value::Sequence(_) | Value::Mapping(_) => Ok(encode_value(value)),
            Value::Null => Err(JsonError::parse("string", "null")),
            other => Err(JsonError::parse(
                "string",
                format!("<{}>", other.kind_name()),
            )),
        }
    }
}

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

impl FromJson for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self> {
        let text = scalar_text(value, "date-time")?;
        DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .ok_or_else(|| JsonError::parse("date-time", text))
    }
}

impl FromJson for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromJson> FromJson for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromJson> FromJson for Box<T> {
    fn from_value(value: &Value) -> Result<Self> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        T::sequence_from_value(value)
    }
}

impl<T: FromJson> FromJson for Box<[T]> {
    fn from_value(value: &Value) -> Result<Self> {
        T::sequence_from_value(value).map(Vec::into_boxed_slice)
    }
}

impl<T: FromJson, const N: usize> FromJson for [T; N] {
    fn from_value(value: &Value) -> Result<Self> {
        T::sequence_from_value(value)?
            .try_into()
            .map_err(|items: Vec<T>| {
                JsonError::Structural(format!(
                    "expected {N} elements, found {}",
                    items.len()
                ))
            })
    }
}

impl<K, V, S> FromJson for HashMap<K, V, S>
where
    K: FromJson + Eq + Hash,
    V: FromJson,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value) -> Result<Self> {
        Ok(decode_map_entries(value)?.into_iter().collect())
    }
}

impl<K: FromJson + Ord, V: FromJson> FromJson for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(decode_map_entries(value)?.into_iter().collect())
    }
}
