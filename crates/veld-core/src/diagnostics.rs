//! Diagnostic collection for module compilation.
//!
//! Validation findings come in exactly two severities: fatal errors, which
//! abort the compilation unit, and advisory warnings, which are recorded
//! here and compilation continues. The registry pushes warnings into a
//! [`Diagnostics`] sink owned by the compilation driver; drivers that want
//! a full transcript may record fatal errors here as well before aborting.

use std::collections::VecDeque;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Aborts the current compilation unit.
    Error,
    /// Advisory only; compilation continues.
    Warning,
}

/// A single compiler diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// Source file, when known.
    pub file: Option<String>,
    /// Line number (1-indexed).
    pub line: u32,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>, file: Option<&str>, line: u32) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            file: file.map(str::to_string),
            line,
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>, file: Option<&str>, line: u32) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            file: file.map(str::to_string),
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if let Some(file) = &self.file {
            write!(f, "{}:{}: {}: {}", file, self.line, severity, self.message)
        } else {
            write!(f, "{}: {}: {}", self.line, severity, self.message)
        }
    }
}

/// Accumulates diagnostics for one compilation unit.
///
/// Diagnostics are kept in the order they were emitted. The error flag is
/// tracked separately so `has_errors` stays O(1).
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: VecDeque<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Error {
            self.has_errors = true;
        }
        self.diagnostics.push_back(diagnostic);
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>, file: Option<&str>, line: u32) {
        self.push(Diagnostic::warning(message, file, line));
    }

    /// Whether any error diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Whether any warning diagnostic was recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Total number of diagnostics.
    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Number of recorded warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Iterate over all diagnostics in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Iterate over only the warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Iterate over only the errors.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Remove all diagnostics and clear the error flag.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.has_errors = false;
    }

    /// Write all diagnostics to the provided writer, one per line.
    pub fn emit<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(writer, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}
