//! Core types for the veld compiler's definition registry.
//!
//! This crate holds the leaf types shared by the registry and the
//! surrounding compiler stages: definition identity ([`Signature`]),
//! visibility/macro classification ([`DefKind`]), source pins ([`Loc`]),
//! the diagnostics sink ([`Diagnostics`]), and the fatal error catalog
//! ([`DefineError`]).

pub mod diagnostics;
pub mod error;
pub mod kind;
pub mod loc;
pub mod signature;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::DefineError;
pub use kind::DefKind;
pub use loc::Loc;
pub use signature::{MACRO_PREFIX, Signature, macro_signature};
