//! Per-module definition registry for the veld compiler.
//!
//! While a module body compiles, the expansion pipeline hands every
//! translated clause to a [`DefinitionStore`], which validates it against
//! the clauses already accumulated and stores it. At module close the
//! store is consumed by [`DefinitionStore::consolidate`], producing the
//! final set of emittable declarations.
//!
//! # Storage Model
//!
//! - **Entries**: one [`store::Entry`] per `(name, arity)` signature,
//!   holding the definition kind, source attribution, and default-argument
//!   bookkeeping.
//! - **Clauses**: an ordered multi-map from signature to [`Clause`]s in
//!   arrival order; consolidation re-emits them in that order.
//!
//! # Thread Safety
//!
//! One store belongs to exactly one module compilation. Writes are
//! sequential; concurrent readers go through [`SharedDefinitionStore`].
//!
//! # Example
//!
//! ```
//! use veld_core::{DefKind, Diagnostics};
//! use veld_registry::{Clause, DefinitionStore, UnpackedDefinition};
//!
//! let mut store = DefinitionStore::new();
//! let mut diags = Diagnostics::new();
//!
//! let clause = Clause::new(3, vec![], "do_start()");
//! store
//!     .store_definition(
//!         &mut diags,
//!         DefKind::Function,
//!         true,
//!         "lib/app.veld",
//!         None,
//!         "start",
//!         UnpackedDefinition::new(clause),
//!     )
//!     .unwrap();
//!
//! let out = store.consolidate();
//! assert_eq!(out.exported.len(), 1);
//! ```

pub mod clause;
pub mod consolidate;
pub mod shared;
pub mod store;
pub mod validate;

pub use clause::{ArgPattern, Clause, DefaultVariant, UnpackedDefinition};
pub use consolidate::{Consolidation, DeclItem, Declaration, PrivateDef};
pub use shared::SharedDefinitionStore;
pub use store::{DefaultInfo, DefinitionStore, Entry};
pub use validate::defaults_conflict;
