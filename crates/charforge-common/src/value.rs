use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use crate::Format;

/// A runtime value produced by formula evaluation. This is distinct from the
/// source representation a loader reads; by the time a value reaches the
/// evaluator it is already one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
    /// An absent value (an unset variable slot, or a cell a loader left blank).
    Empty,
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Number(n) => n.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Empty => state.write_u8(0),
        }
    }
}

impl Eq for Value {}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Empty => Ok(()),
        }
    }
}

impl Value {
    /// The format this value belongs to, or `None` for `Empty` (an empty
    /// value is format-less until a consumer asserts one).
    pub fn format(&self) -> Option<Format> {
        match self {
            Value::Number(_) => Some(Format::Number),
            Value::Text(_) => Some(Format::Text),
            Value::Boolean(_) => Some(Format::Boolean),
            Value::Empty => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_of_values() {
        assert_eq!(Value::Number(3.0).format(), Some(Format::Number));
        assert_eq!(Value::Text("a".into()).format(), Some(Format::Text));
        assert_eq!(Value::Boolean(true).format(), Some(Format::Boolean));
        assert_eq!(Value::Empty.format(), None);
    }

    #[test]
    fn display_is_plain() {
        assert_eq!(Value::Number(15.0).to_string(), "15");
        assert_eq!(Value::Text("Sword".into()).to_string(), "Sword");
        assert_eq!(Value::Empty.to_string(), "");
    }
}
