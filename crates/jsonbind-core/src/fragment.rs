//! Value Classifier: decides what kind of JSON fragment a span of text is.
//!
//! Classification looks only at the first and last characters of the trimmed
//! text. No deeper validation is done: `{ garbage }` is an Object fragment.

use std::fmt;

/// Syntactic kind of a trimmed JSON fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
    /// `" ... "`
    QuotedString,
    /// Anything else: numbers, `true`, `false`, `null`, bare words.
    Literal,
}

impl FragmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FragmentKind::Object => "object",
            FragmentKind::Array => "array",
            FragmentKind::QuotedString => "string",
            FragmentKind::Literal => "literal",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trimmed, classified view into JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    text: &'a str,
    kind: FragmentKind,
}

impl<'a> Fragment<'a> {
    pub fn new(text: &'a str) -> Self {
        let text = text.trim();
        Self {
            text,
            kind: classify(text),
        }
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    /// The trimmed fragment text, delimiters included.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// The fragment with one layer of delimiters removed and re-trimmed.
    /// A literal has no delimiters and is returned as is.
    pub fn inner(&self) -> &'a str {
        match self.kind {
            FragmentKind::Literal => self.text,
            _ => self.text[1..self.text.len() - 1].trim(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind == FragmentKind::Literal && self.text == "null"
    }
}

/// True iff the trimmed text starts with `{` and ends with `}`.
pub fn is_json_object(text: &str) -> bool {
    is_wrapped(text.trim(), '{', '}')
}

fn classify(trimmed: &str) -> FragmentKind {
    if is_wrapped(trimmed, '{', '}') {
        FragmentKind::Object
    } else if is_wrapped(trimmed, '[', ']') {
        FragmentKind::Array
    } else if is_wrapped(trimmed, '"', '"') {
        FragmentKind::QuotedString
    } else {
        FragmentKind::Literal
    }
}

// A lone `"` is not a quoted string: the opener and closer must be distinct
// characters.
fn is_wrapped(trimmed: &str, opener: char, closer: char) -> bool {
    trimmed.len() >= 2 && trimmed.starts_with(opener) && trimmed.ends_with(closer)
}
