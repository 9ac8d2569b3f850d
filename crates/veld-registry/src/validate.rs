//! Per-insert consistency rules.
//!
//! Every rule here is a pure decision over in-memory state; the store runs
//! them on each insert, before the entry's bookkeeping is overwritten.

use veld_core::{DefineError, Signature};

use crate::clause::ArgPattern;
use crate::store::DefaultInfo;

/// Outcome of the default-argument shape check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DefaultCheck {
    /// The clause is fine.
    Ok,
    /// The clause declares defaults but an earlier sibling did not; warn
    /// that defaults should come first.
    DefaultsNotFirst,
}

/// Apply the default-argument decision table against the entry's history.
///
/// `prev` holds the entry's bookkeeping from before this insert. Rows are
/// applied in order; the first match wins.
pub(crate) fn check_defaults(
    signature: &Signature,
    prev: &DefaultInfo,
    incoming_count: u32,
    line: u32,
) -> Result<DefaultCheck, DefineError> {
    // A bodied clause that declared defaults admits no further clauses.
    if prev.last_has_body && prev.last_count > 0 {
        return Err(DefineError::DefaultsWithMultipleClauses {
            signature: signature.clone(),
            line,
        });
    }
    if incoming_count == 0 {
        return Ok(DefaultCheck::Ok);
    }
    if prev.last_count == 0 {
        return Ok(DefaultCheck::DefaultsNotFirst);
    }
    // Previous clause was a head with defaults; declaring them again is ambiguous.
    Err(DefineError::DuplicateDefaults {
        signature: signature.clone(),
        line,
    })
}

/// Whether the grouping warning should fire for this insert.
///
/// Only advisory: clauses of one signature interleaved with another
/// definition compile fine but read badly. Requires the check flag on both
/// the stored entry and the current call, and a last-touched signature
/// that differs from this one.
pub(crate) fn ungrouped(
    entry_check: bool,
    check: bool,
    last_touched: Option<&Signature>,
    signature: &Signature,
) -> bool {
    entry_check && check && last_touched.is_some_and(|last| last != signature)
}

/// Whether two definitions' default-expanded arity ranges overlap.
///
/// A definition of arity `a` with `d` defaults also answers calls at
/// arities `[a - d, a)`. Two same-name definitions conflict when either
/// one's base arity falls inside the other's expanded range. The relation
/// is symmetric.
pub fn defaults_conflict(arity_a: u32, defaults_a: u32, arity_b: u32, defaults_b: u32) -> bool {
    covers(arity_a, defaults_a, arity_b) || covers(arity_b, defaults_b, arity_a)
}

fn covers(arity: u32, defaults: u32, candidate: u32) -> bool {
    (arity.saturating_sub(defaults)..arity).contains(&candidate)
}

/// Whether a definition name collides with the reserved alias special form.
///
/// Only the exact shape `alias(<atom>)` is reserved; any other arity or
/// argument pattern is an ordinary definition.
pub(crate) fn reserved_alias(name: &str, args: &[ArgPattern]) -> bool {
    name == "alias" && args.len() == 1 && matches!(args[0], ArgPattern::Atom(_))
}
