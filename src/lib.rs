//! Facade crate for the veld definition registry.
//!
//! Re-exports the core types and the registry so drivers can depend on a
//! single crate. See [`veld_registry`] for the storage model.

pub use veld_core::{
    DefKind, DefineError, Diagnostic, Diagnostics, Loc, MACRO_PREFIX, Severity, Signature,
    macro_signature,
};
pub use veld_registry::{
    ArgPattern, Clause, Consolidation, DeclItem, Declaration, DefaultInfo, DefaultVariant,
    DefinitionStore, Entry, PrivateDef, SharedDefinitionStore, UnpackedDefinition,
    defaults_conflict,
};
