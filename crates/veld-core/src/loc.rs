//! Source attribution for definitions.
//!
//! Most definitions are attributed to the line where their first clause
//! appears. A [`Loc`] is the external override: a `(file, line)` pin
//! supplied by a collaborator when a definition's source attribution was
//! redirected (for example by generated code).

use std::fmt;

/// An external `(file, line)` source pin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Loc {
    /// Source file the definition is attributed to.
    pub file: String,
    /// Line within that file (1-indexed).
    pub line: u32,
}

impl Loc {
    /// Create a new pin.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
