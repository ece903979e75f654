//! Error types for JSON conversion operations.

use thiserror::Error;

/// Errors that can occur while converting between JSON text and typed values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonError {
    /// An object fragment had no elements, none of its elements matched a
    /// field of the target type, or a container had the wrong kind or length.
    #[error("Structural error: {0}")]
    Structural(String),

    /// An enum member name was not registered on the target enum.
    #[error("Unknown member {name:?} for {type_name}")]
    Name {
        type_name: &'static str,
        name: String,
    },

    /// A scalar literal could not be parsed into the target kind.
    #[error("Cannot parse {literal:?} as {kind}")]
    Parse { kind: &'static str, literal: String },

    /// The type registry handed back metadata that does not belong to the
    /// requested type. Never recovered locally.
    #[error("Access error: {0}")]
    Access(String),

    /// The input text was absent, blank, or not the kind of fragment the
    /// operation requires.
    #[error("Invalid JSON text: {0}")]
    InvalidInput(String),
}

impl JsonError {
    pub(crate) fn parse(kind: &'static str, literal: impl Into<String>) -> Self {
        JsonError::Parse {
            kind,
            literal: literal.into(),
        }
    }

    /// Whether an object decode may swallow this error and leave the field as
    /// allocated.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, JsonError::Access(_))
    }
}

/// Convenience alias used throughout jsonbind-core.
pub type Result<T> = std::result::Result<T, JsonError>;
