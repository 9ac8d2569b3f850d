//! Definition identity during module compilation.
//!
//! A [`Signature`] is the primary key of the definition registry: the pair
//! of a definition's name and its arity. Clauses with the same signature
//! belong to the same definition family.

use std::cmp::Ordering;
use std::fmt;

/// Prefix applied to a macro's name when it is exported.
///
/// The dash keeps mangled names out of the space of surface identifiers,
/// so an exported macro can never collide with an ordinary function.
pub const MACRO_PREFIX: &str = "MACRO-";

/// A `(name, arity)` pair identifying a definition family.
///
/// # Examples
///
/// ```
/// use veld_core::Signature;
///
/// let sig = Signature::new("parse", 2);
/// assert_eq!(sig.to_string(), "parse/2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Definition name.
    pub name: String,
    /// Number of arguments.
    pub arity: u32,
}

impl Signature {
    /// Create a new signature.
    pub fn new(name: impl Into<String>, arity: u32) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    /// The same name at a different arity.
    pub fn with_arity(&self, arity: u32) -> Self {
        Self {
            name: self.name.clone(),
            arity,
        }
    }
}

// Ordered by name, then arity. The consolidated def/defmacro sets rely on
// this to stay independent of map iteration order.
impl Ord for Signature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then(self.arity.cmp(&other.arity))
    }
}

impl PartialOrd for Signature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Compute the exported signature of a macro.
///
/// Macros receive one implicit leading argument carrying caller context, so
/// the exported arity is one higher than the surface arity, and the name is
/// prefixed with [`MACRO_PREFIX`]. Pure so it can be tested independently
/// of storage.
pub fn macro_signature(sig: &Signature) -> Signature {
    Signature {
        name: format!("{}{}", MACRO_PREFIX, sig.name),
        arity: sig.arity + 1,
    }
}
