//! Formula-engine error representation.
//!
//! - **`FormulaErrorKind`** : the closed set of hard failure categories
//! - **`FormulaError`**     : kind + optional human explanation
//!
//! Hard errors abort before evaluation ever starts (a formula that fails its
//! semantics pass is never evaluated). Soft data misses are *not* errors:
//! evaluation substitutes a format default and reports through the
//! diagnostic sink instead.

use std::{error::Error, fmt};

/// All recognised hard failure categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FormulaErrorKind {
    /// The semantics pass rejected the expression (arity, argument kind,
    /// cross-argument type mismatch, unknown function or table).
    Semantics,
    /// A data table could not be constructed (duplicate column, ragged row,
    /// cell outside its column's format).
    Table,
    /// A registry refused a registration (duplicate name).
    Registry,
    /// A scope name that is not a legal scope kind.
    UnknownScope,
    /// A character identity the facet has never seen.
    UnknownCharacter,
}

impl fmt::Display for FormulaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Semantics => "semantics error",
            Self::Table => "table error",
            Self::Registry => "registry error",
            Self::UnknownScope => "unknown scope",
            Self::UnknownCharacter => "unknown character",
        })
    }
}

/// The single error struct the engine's APIs pass around.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormulaError {
    pub kind: FormulaErrorKind,
    pub message: Option<String>,
}

impl From<FormulaErrorKind> for FormulaError {
    fn from(kind: FormulaErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }
}

impl FormulaError {
    pub fn new(kind: FormulaErrorKind) -> Self {
        kind.into()
    }

    /// Attach a human-readable explanation.
    pub fn with_message<S: Into<String>>(mut self, msg: S) -> Self {
        self.message = Some(msg.into());
        self
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref msg) = self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl Error for FormulaError {}

impl From<FormulaError> for String {
    fn from(error: FormulaError) -> Self {
        format!("{error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let e = FormulaError::new(FormulaErrorKind::UnknownScope).with_message("\"AREA\"");
        assert_eq!(e.to_string(), "unknown scope: \"AREA\"");
        let bare = FormulaError::new(FormulaErrorKind::Semantics);
        assert_eq!(bare.to_string(), "semantics error");
    }
}
