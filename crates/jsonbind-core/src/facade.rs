//! Public entry points.
//!
//! Thin wrappers over the decoder and encoder, plus lookup helpers that read
//! one top-level element of an object without decoding the rest.

use crate::decoder::{decode, parse, unquote, FromJson};
use crate::encoder::{encode, ToJson};
use crate::error::{JsonError, Result};
use crate::fragment::{Fragment, FragmentKind};
use crate::splitter::{split_elements, split_key_value};
use crate::value::Value;

/// Encode a value as JSON text.
pub fn to_json_string<T: ToJson + ?Sized>(value: &T) -> String {
    encode(value)
}

/// Decode JSON text into `T`.
///
/// # Errors
///
/// [`JsonError::InvalidInput`] for blank text; otherwise whatever the target
/// type's projection reports.
pub fn to_obj<T: FromJson>(text: &str) -> Result<T> {
    decode(text)
}

/// Decode a JSON array into a `Vec<T>`.
pub fn to_list<T: FromJson>(text: &str) -> Result<Vec<T>> {
    decode(text)
}

/// Decode the top-level element `key` of an object into `T`.
///
/// A missing key decodes as `null`, so `Option<T>` yields `None` and any other
/// target fails with [`JsonError::Parse`].
pub fn get_element_value<T: FromJson>(key: &str, text: &str) -> Result<T> {
    match get_element_raw_value(key, text)? {
        Some(raw) => T::from_value(&parse(raw)),
        None => T::from_value(&Value::Null),
    }
}

/// The raw text of the top-level element `key` of an object, quotes and all.
///
/// Returns `Ok(None)` when no element has that key. When a key repeats, the
/// last element wins, as in object decoding.
///
/// ```
/// let text = r#"{ "Data1": "Something Useless", "Price": 2.57 }"#;
/// assert_eq!(jsonbind_core::get_element_raw_value("Price", text), Ok(Some("2.57")));
/// assert_eq!(jsonbind_core::get_element_raw_value("price", text), Ok(None));
/// ```
///
/// # Errors
///
/// [`JsonError::InvalidInput`] when `text` is not an object.
pub fn get_element_raw_value<'a>(key: &str, text: &'a str) -> Result<Option<&'a str>> {
    let fragment = Fragment::new(text);
    if fragment.kind() != FragmentKind::Object {
        return Err(JsonError::InvalidInput(format!(
            "element lookup needs a JSON object, found {}",
            fragment.kind()
        )));
    }
    Ok(split_elements(fragment.inner())
        .into_iter()
        .filter_map(split_key_value)
        .filter(|(name, _)| unquote(name) == key)
        .map(|(_, raw)| raw)
        .last())
}
