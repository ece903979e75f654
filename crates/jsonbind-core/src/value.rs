//! Intermediate value model shared by the decoder and the encoder.
//!
//! Every native type converts to and from [`Value`] through the [`FromJson`] and
//! [`ToJson`] traits, so the text layer only ever deals with these eight
//! variants.
//!
//! [`FromJson`]: crate::FromJson
//! [`ToJson`]: crate::ToJson

use std::fmt;

/// A JSON value as seen by jsonbind.
///
/// Objects and mappings keep their entries in source order. `Bytes` never comes
/// out of the parser (base64 text parses as `Text`); it is produced by native
/// byte sequences on the way out.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Bytes(Vec<u8>),
    Sequence(Vec<Value>),
    /// Key/value pairs, written as an array of single-entry objects.
    Mapping(Vec<(Value, Value)>),
    /// Field name/value pairs in declaration order.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Sequence(_) => "array",
            Value::Mapping(_) => "map",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up an object entry. When a key repeats, the last entry wins.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries
                .iter()
                .rev()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A numeric literal, kept in its textual form.
///
/// Keeping the spelling means `79` decoded into a `String` field stays `"79"`,
/// and parsing into the target width happens only once the target is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Wrap a literal if it looks numeric: an optional sign followed by a digit
    /// or a dot, and parseable as `f64`.
    pub fn from_literal(literal: &str) -> Option<Self> {
        let unsigned = literal.strip_prefix(['-', '+']).unwrap_or(literal);
        let starts_numeric = unsigned
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.');
        if starts_numeric && literal.parse::<f64>().is_ok() {
            Some(Number(literal.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! number_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number(n.to_string())
                }
            }
        )*
    };
}

number_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Number {
    /// Finite floats only; NaN and infinities have no JSON spelling.
    pub fn from_f64(f: f64) -> Option<Self> {
        f.is_finite().then(|| Number(f.to_string()))
    }

    pub fn from_f32(f: f32) -> Option<Self> {
        f.is_finite().then(|| Number(f.to_string()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}
