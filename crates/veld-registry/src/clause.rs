//! Clause records and the contract with the default-argument expander.
//!
//! The registry never interprets clause bodies; they are opaque payloads
//! produced by the expansion/translation pipeline. Argument patterns are
//! modeled only as far as the pre-insert validations need to distinguish
//! them: bare variables, variables declaring a default, atoms (for the
//! reserved-name guard), and everything else.

use std::fmt;

/// An argument pattern in a clause head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgPattern {
    /// A bare variable, e.g. `x`.
    Var(String),
    /// A variable declaring a default value, e.g. `x \\ 0`.
    VarDefault(String),
    /// An atom literal.
    Atom(String),
    /// Any other surface pattern; opaque to the registry.
    Other,
}

impl ArgPattern {
    /// Whether this pattern may appear in a bodyless clause head.
    pub fn allowed_in_head(&self) -> bool {
        matches!(self, ArgPattern::Var(_) | ArgPattern::VarDefault(_))
    }

    /// Whether this pattern declares a default value.
    pub fn declares_default(&self) -> bool {
        matches!(self, ArgPattern::VarDefault(_))
    }
}

/// One pattern/guard/body alternative of a definition.
///
/// Stored append-only per signature; consolidation re-emits clauses in
/// arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Line where the clause appeared (1-indexed).
    pub line: u32,
    /// Argument patterns of the clause head.
    pub args: Vec<ArgPattern>,
    /// Translated body, or `None` for a head-only clause.
    pub body: Option<String>,
}

impl Clause {
    /// Create a bodied clause.
    pub fn new(line: u32, args: Vec<ArgPattern>, body: impl Into<String>) -> Self {
        Self {
            line,
            args,
            body: Some(body.into()),
        }
    }

    /// Create a head-only clause.
    pub fn head(line: u32, args: Vec<ArgPattern>) -> Self {
        Self {
            line,
            args,
            body: None,
        }
    }

    /// Arity of the clause, derived from its argument patterns.
    pub fn arity(&self) -> u32 {
        self.args.len() as u32
    }

    /// Whether the clause has an executable body.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clause/{} at line {}", self.arity(), self.line)
    }
}

/// A synthesized reduced-arity clause produced by the default expander.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultVariant {
    /// The synthesized clause.
    pub clause: Clause,
    /// Number of default-argument variants this clause itself declares.
    pub default_count: u32,
}

/// The unpacked form of one surface definition.
///
/// The default-argument expander hands the registry the primary clause
/// plus zero or more synthesized variants, each tagged with its own
/// default count. The registry inserts them through the same bookkeeping
/// as ordinary clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct UnpackedDefinition {
    /// The primary clause as written in source.
    pub primary: Clause,
    /// Number of default-argument variants the primary clause declares.
    pub default_count: u32,
    /// Synthesized reduced-arity variants, if any.
    pub variants: Vec<DefaultVariant>,
}

impl UnpackedDefinition {
    /// Wrap a clause, deriving its default count from the argument patterns.
    pub fn new(primary: Clause) -> Self {
        let default_count = primary
            .args
            .iter()
            .filter(|a| a.declares_default())
            .count() as u32;
        Self {
            primary,
            default_count,
            variants: Vec::new(),
        }
    }

    /// Add a synthesized variant.
    pub fn with_variant(mut self, clause: Clause, default_count: u32) -> Self {
        self.variants.push(DefaultVariant {
            clause,
            default_count,
        });
        self
    }
}
