//! Per-module definition storage.
//!
//! A [`DefinitionStore`] accumulates function and macro clauses while one
//! module body is being compiled. It owns two maps: an entry map with one
//! metadata record per signature, and a clause map preserving arrival
//! order per signature. Consistency rules run on every insert; the store
//! is consumed once by [`consolidate`](DefinitionStore::consolidate) at
//! module close.
//!
//! # Thread Safety
//!
//! `DefinitionStore` is not synchronized. All writes for one module
//! compilation are sequential; stages that need to read the store while
//! the driver holds it should go through
//! [`SharedDefinitionStore`](crate::SharedDefinitionStore).

use std::fmt;

use rustc_hash::FxHashMap;

use veld_core::{DefKind, DefineError, Diagnostics, Loc, Signature};

use crate::clause::{Clause, UnpackedDefinition};
use crate::validate::{self, DefaultCheck};

/// Default-argument bookkeeping for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultInfo {
    /// Highest default count seen across the entry's clauses.
    pub max: u32,
    /// Whether the most recent clause had a body.
    pub last_has_body: bool,
    /// Default count declared by the most recent clause.
    pub last_count: u32,
}

/// Metadata for one definition family.
///
/// `kind`, `file`, `first_line`, and `pin` are fixed at the first insert;
/// the rest is updated on every clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Definition kind; immutable after the first insert.
    pub kind: DefKind,
    /// File the definition first appeared in.
    pub file: String,
    /// Line of the first clause.
    pub first_line: u32,
    /// External source pin, if a collaborator supplied one.
    pub pin: Option<Loc>,
    /// Check flag of the most recent insert.
    pub check: bool,
    /// Default-argument bookkeeping.
    pub defaults: DefaultInfo,
    /// Line of the most recent clause that declared defaults. Synthesized
    /// default-variant declarations are attributed here.
    pub defaults_line: Option<u32>,
    /// Discovery index; fixes consolidation order over the unordered map.
    pub(crate) index: u64,
}

/// Mutable definition registry for one module compilation.
#[derive(Default)]
pub struct DefinitionStore {
    pub(crate) entries: FxHashMap<Signature, Entry>,
    pub(crate) clauses: FxHashMap<Signature, Vec<Clause>>,
    last_touched: Option<Signature>,
    next_index: u64,
}

impl DefinitionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one clause for `signature`.
    ///
    /// Creates the entry on first insert; on later inserts the consistency
    /// rules run against the entry's previous bookkeeping before it is
    /// overwritten. Advisory findings go into `diags`; fatal findings are
    /// returned and leave the stored entry unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn define(
        &mut self,
        diags: &mut Diagnostics,
        check: bool,
        kind: DefKind,
        file: &str,
        pin: Option<Loc>,
        signature: Signature,
        default_count: u32,
        clause: Clause,
    ) -> Result<(), DefineError> {
        let line = clause.line;
        match self.entries.get_mut(&signature) {
            None => {
                let entry = Entry {
                    kind,
                    file: file.to_string(),
                    first_line: line,
                    pin,
                    check,
                    defaults: DefaultInfo {
                        max: default_count,
                        last_has_body: clause.has_body(),
                        last_count: default_count,
                    },
                    defaults_line: (default_count > 0).then_some(line),
                    index: self.next_index,
                };
                self.next_index += 1;
                self.entries.insert(signature.clone(), entry);
            }
            Some(entry) => {
                if entry.kind != kind {
                    return Err(DefineError::KindMismatch {
                        signature,
                        previous: entry.kind,
                        first_line: entry.first_line,
                        line,
                    });
                }
                if validate::ungrouped(entry.check, check, self.last_touched.as_ref(), &signature)
                {
                    let origin = match &entry.pin {
                        Some(pin) => pin.to_string(),
                        None => format!("{}:{}", entry.file, entry.first_line),
                    };
                    diags.warn(
                        format!(
                            "clauses with the same name and arity ({}) should be \
                             grouped together; {} was previously defined at {}",
                            signature, signature, origin
                        ),
                        Some(file),
                        line,
                    );
                }
                match validate::check_defaults(&signature, &entry.defaults, default_count, line)? {
                    DefaultCheck::Ok => {}
                    DefaultCheck::DefaultsNotFirst => diags.warn(
                        format!(
                            "clause with default values should be the first clause in {}",
                            signature
                        ),
                        Some(file),
                        line,
                    ),
                }
                entry.defaults.max = entry.defaults.max.max(default_count);
                entry.defaults.last_has_body = clause.has_body();
                entry.defaults.last_count = default_count;
                if default_count > 0 {
                    entry.defaults_line = Some(line);
                }
                entry.check = check;
            }
        }

        self.clauses.entry(signature.clone()).or_default().push(clause);
        if check {
            self.last_touched = Some(signature);
        }
        Ok(())
    }

    /// Register one surface definition: the driver-facing entry point.
    ///
    /// Runs the pre-insert validations (reserved name, bodyless-clause
    /// argument shape, missing body) and the cross-entry default-arity
    /// conflict scan, then inserts the primary clause followed by each
    /// synthesized variant. The conflict scan runs once per call, never
    /// per variant.
    #[allow(clippy::too_many_arguments)]
    pub fn store_definition(
        &mut self,
        diags: &mut Diagnostics,
        kind: DefKind,
        check: bool,
        file: &str,
        pin: Option<Loc>,
        name: &str,
        unpacked: UnpackedDefinition,
    ) -> Result<(), DefineError> {
        let signature = Signature::new(name, unpacked.primary.arity());
        let line = unpacked.primary.line;

        if validate::reserved_alias(name, &unpacked.primary.args) {
            return Err(DefineError::ReservedName { signature, line });
        }
        if !unpacked.primary.has_body() {
            if unpacked.primary.args.iter().any(|a| !a.allowed_in_head()) {
                return Err(DefineError::BodylessClauseArgs { signature, line });
            }
            if unpacked.default_count == 0 && !self.entries.contains_key(&signature) {
                return Err(DefineError::MissingBody { signature, line });
            }
        }
        for (other, entry) in &self.entries {
            if other.name == signature.name
                && other.arity != signature.arity
                && validate::defaults_conflict(
                    other.arity,
                    entry.defaults.max,
                    signature.arity,
                    unpacked.default_count,
                )
            {
                return Err(DefineError::DefaultConflict {
                    signature,
                    conflicting: other.clone(),
                    line,
                });
            }
        }

        let UnpackedDefinition {
            primary,
            default_count,
            variants,
        } = unpacked;
        self.define(
            diags,
            check,
            kind,
            file,
            pin.clone(),
            signature,
            default_count,
            primary,
        )?;
        // Synthesized variants never participate in the grouping check.
        for variant in variants {
            let sig = Signature::new(name, variant.clause.arity());
            self.define(
                diags,
                false,
                kind,
                file,
                pin.clone(),
                sig,
                variant.default_count,
                variant.clause,
            )?;
        }
        Ok(())
    }

    /// Look up an entry and its clauses in arrival order.
    pub fn lookup(&self, signature: &Signature) -> Option<(&Entry, &[Clause])> {
        let entry = self.entries.get(signature)?;
        let clauses = self
            .clauses
            .get(signature)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Some((entry, clauses))
    }

    /// Remove a definition and all its clauses. No error if absent.
    pub fn delete(&mut self, signature: &Signature) {
        self.entries.remove(signature);
        self.clauses.remove(signature);
        if self.last_touched.as_ref() == Some(signature) {
            self.last_touched = None;
        }
    }

    /// Clear the last-touched marker only.
    ///
    /// Used when the store is reused across interactive evaluation units
    /// without discarding accumulated definitions.
    pub fn reset(&mut self) {
        self.last_touched = None;
    }

    /// Number of registered definition families.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of stored clauses.
    pub fn clause_count(&self) -> usize {
        self.clauses.values().map(Vec::len).sum()
    }
}

impl fmt::Debug for DefinitionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionStore")
            .field("entries", &self.entries.len())
            .field("clauses", &self.clause_count())
            .field("last_touched", &self.last_touched)
            .finish()
    }
}
