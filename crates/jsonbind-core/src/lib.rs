//! # jsonbind-core
//!
//! Bidirectional conversion between JSON text and typed Rust values, driven by
//! each type's registered field table rather than a schema.
//!
//! Text is split and classified by hand, parsed into an intermediate [`Value`],
//! and then projected onto the target type. The house style on the way out is
//! spaced (`{ "a": 1 }`, `[ 1, 2 ]`) with a few non-standard conventions: byte
//! sequences are base64 strings, maps are arrays of single-entry objects, and
//! numbers or booleans are accepted from quoted strings.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonbind_core::{json_object, to_json_string, to_obj, JsonObject, TypeBuilder};
//!
//! struct Flags {
//!     value1: bool,
//!     value2: bool,
//! }
//!
//! impl JsonObject for Flags {
//!     fn allocate() -> Self {
//!         Flags { value1: false, value2: false }
//!     }
//!
//!     fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
//!         ty.public("Value1", |f| &f.value1, |f| &mut f.value1)
//!             .public("Value2", |f| &f.value2, |f| &mut f.value2)
//!     }
//! }
//!
//! json_object!(Flags);
//!
//! let flags: Flags = to_obj(r#"{"Value1": true, "Value2": false}"#).unwrap();
//! assert!(flags.value1 && !flags.value2);
//! assert_eq!(to_json_string(&flags), r#"{ "Value1": true, "Value2": false }"#);
//! ```
//!
//! ## Modules
//!
//! - [`splitter`]: top-level element splitting of object/array bodies
//! - [`fragment`]: syntactic classification of a span of JSON text
//! - [`decoder`]: JSON text → [`Value`] → typed value
//! - [`encoder`]: typed value → [`Value`] → JSON text
//! - [`metadata`]: per-type field tables and the process-wide registry
//! - [`error`]: error type for all conversion failures

pub mod decoder;
pub mod encoder;
pub mod error;
mod facade;
pub mod fragment;
mod macros;
pub mod metadata;
pub mod splitter;
pub mod value;

pub use decoder::{parse, FromJson};
pub use encoder::{encode_value, ToJson};
pub use error::{JsonError, Result};
pub use facade::{get_element_raw_value, get_element_value, to_json_string, to_list, to_obj};
pub use fragment::is_json_object;
pub use metadata::{
    descriptor, Describe, FieldDescriptor, JsonEnum, JsonObject, Shape, TypeBuilder,
    TypeDescriptor, Visibility,
};
pub use value::{Number, Value};
