//! Visibility and macro-ness classification for definitions.

use std::fmt;

/// The kind of a definition.
///
/// Fixed at the first clause of a definition family; every later clause
/// must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// Public function, exported from the module.
    Function,
    /// Private function, callable only within the module.
    PrivateFunction,
    /// Public macro, exported with a mangled signature.
    Macro,
    /// Private macro, never exported and never emitted.
    PrivateMacro,
}

impl DefKind {
    /// Whether definitions of this kind are visible outside the module.
    pub fn is_public(&self) -> bool {
        matches!(self, DefKind::Function | DefKind::Macro)
    }

    /// Whether this kind is a macro.
    pub fn is_macro(&self) -> bool {
        matches!(self, DefKind::Macro | DefKind::PrivateMacro)
    }
}

impl fmt::Display for DefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefKind::Function => write!(f, "public function"),
            DefKind::PrivateFunction => write!(f, "private function"),
            DefKind::Macro => write!(f, "public macro"),
            DefKind::PrivateMacro => write!(f, "private macro"),
        }
    }
}
