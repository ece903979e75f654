//! Element Splitter: partitions the body of a JSON object or array into its
//! top-level elements.
//!
//! The splitter works on the text *between* the outer braces/brackets. It keeps a
//! nesting-depth counter (`{`/`[` open, `}`/`]` close) and cuts an element at every
//! comma seen at depth 0. Everything inside a double-quoted string is opaque: a
//! comma, brace or bracket within `"a,{b}"` never moves the depth or ends an
//! element. There are no escapes: a backslash is ordinary text and the next `"`
//! always closes the string.
//!
//! Slices are returned trimmed and borrowed from the input, so callers can hand
//! out raw element text without copying.

/// Split an object/array body into trimmed top-level element slices.
///
/// Empty elements (from `a,,b` or a trailing comma) are dropped, so empty or
/// whitespace-only input yields an empty vector.
pub fn split_elements(body: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut scanner = Scanner::default();
    let mut start = 0;

    for (i, ch) in body.char_indices() {
        if scanner.step(ch) && ch == ',' {
            push_trimmed(&mut elements, &body[start..i]);
            start = i + 1;
        }
    }
    push_trimmed(&mut elements, &body[start..]);
    elements
}

/// Split an object element (`"key": value`) at its first top-level colon.
///
/// Returns trimmed `(key, value)` slices; the key keeps its quotes. Returns
/// `None` when the element has no key separator.
pub fn split_key_value(element: &str) -> Option<(&str, &str)> {
    let mut scanner = Scanner::default();
    for (i, ch) in element.char_indices() {
        if scanner.step(ch) && ch == ':' {
            return Some((element[..i].trim(), element[i + 1..].trim()));
        }
    }
    None
}

/// Depth and string-state tracker shared by both split operations.
#[derive(Default)]
struct Scanner {
    depth: usize,
    in_string: bool,
}

impl Scanner {
    /// Feed one character. Returns true when `ch` sits at depth 0 outside any
    /// string, i.e. when it may act as a separator.
    fn step(&mut self, ch: char) -> bool {
        if self.in_string {
            if ch == '"' {
                self.in_string = false;
            }
            return false;
        }
        match ch {
            '"' => {
                self.in_string = true;
                false
            }
            '{' | '[' => {
                self.depth += 1;
                false
            }
            '}' | ']' => {
                // Unbalanced closers are tolerated rather than underflowing.
                self.depth = self.depth.saturating_sub(1);
                false
            }
            _ => self.depth == 0,
        }
    }
}

fn push_trimmed<'a>(elements: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        elements.push(trimmed);
    }
}
