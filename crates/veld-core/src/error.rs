//! Fatal definition errors.
//!
//! Every variant aborts the current compilation unit and carries enough
//! context (signature and line) for the driver to surface a user-facing
//! message. Advisory findings never appear here; they go through the
//! [`Diagnostics`](crate::Diagnostics) sink instead.

use thiserror::Error;

use crate::{DefKind, Signature};

/// Errors raised while registering definition clauses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefineError {
    /// A later clause used a different definition kind than the first.
    #[error("{signature} already defined as {previous} at line {first_line}")]
    KindMismatch {
        signature: Signature,
        previous: DefKind,
        first_line: u32,
        line: u32,
    },

    /// A bodied clause with defaults was followed by another clause.
    #[error(
        "{signature} has default values and multiple clauses; \
         define a function head with the defaults"
    )]
    DefaultsWithMultipleClauses { signature: Signature, line: u32 },

    /// Defaults were declared in more than one clause.
    #[error("{signature} declares default values in more than one clause")]
    DuplicateDefaults { signature: Signature, line: u32 },

    /// The default-expanded arities of two definitions overlap.
    #[error("{signature} conflicts with the default values declared for {conflicting}")]
    DefaultConflict {
        signature: Signature,
        conflicting: Signature,
        line: u32,
    },

    /// A bodyless clause used argument patterns other than bare variables
    /// or variables with defaults.
    #[error(
        "{signature} has a clause without a body; \
         only variables and variables with default values are allowed as its arguments"
    )]
    BodylessClauseArgs { signature: Signature, line: u32 },

    /// The definition name is reserved for alias syntax.
    #[error("cannot define {signature}; the name is reserved for alias syntax")]
    ReservedName { signature: Signature, line: u32 },

    /// A clause with no body, no defaults, and no prior clauses to attach to.
    #[error("{signature} has no body and no previous clauses")]
    MissingBody { signature: Signature, line: u32 },
}

impl DefineError {
    /// The signature the error is about.
    pub fn signature(&self) -> &Signature {
        match self {
            DefineError::KindMismatch { signature, .. }
            | DefineError::DefaultsWithMultipleClauses { signature, .. }
            | DefineError::DuplicateDefaults { signature, .. }
            | DefineError::DefaultConflict { signature, .. }
            | DefineError::BodylessClauseArgs { signature, .. }
            | DefineError::ReservedName { signature, .. }
            | DefineError::MissingBody { signature, .. } => signature,
        }
    }

    /// The line where the offending clause appeared.
    pub fn line(&self) -> u32 {
        match self {
            DefineError::KindMismatch { line, .. }
            | DefineError::DefaultsWithMultipleClauses { line, .. }
            | DefineError::DuplicateDefaults { line, .. }
            | DefineError::DefaultConflict { line, .. }
            | DefineError::BodylessClauseArgs { line, .. }
            | DefineError::ReservedName { line, .. }
            | DefineError::MissingBody { line, .. } => *line,
        }
    }
}
