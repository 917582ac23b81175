use std::fmt::{self, Display};

use crate::Value;

/// The closed set of managed value types the formula engine understands.
///
/// A `Format` plays the role a format-manager object does in the data files:
/// it names the type, supplies the fallback value evaluation substitutes when
/// data is missing, and two formats are equal iff they denote the same
/// managed type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    Number,
    Text,
    Boolean,
}

impl Format {
    /// The value evaluation falls back to when a lookup misses.
    pub fn default_value(&self) -> Value {
        match self {
            Format::Number => Value::Number(0.0),
            Format::Text => Value::Text(String::new()),
            Format::Boolean => Value::Boolean(false),
        }
    }

    /// The identifier data files use for this format.
    pub fn identifier(&self) -> &'static str {
        match self {
            Format::Number => "NUMBER",
            Format::Text => "STRING",
            Format::Boolean => "BOOLEAN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NUMBER" => Some(Format::Number),
            "STRING" => Some(Format::Text),
            "BOOLEAN" => Some(Format::Boolean),
            _ => None,
        }
    }

    /// Whether `value` is a member of this format. `Empty` belongs to no
    /// format; consumers substitute `default_value` for it instead.
    pub fn accepts(&self, value: &Value) -> bool {
        value.format() == Some(*self)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_per_format() {
        assert_eq!(Format::Number.default_value(), Value::Number(0.0));
        assert_eq!(Format::Text.default_value(), Value::Text(String::new()));
        assert_eq!(Format::Boolean.default_value(), Value::Boolean(false));
    }

    #[test]
    fn parse_round_trips_identifier() {
        for f in [Format::Number, Format::Text, Format::Boolean] {
            assert_eq!(Format::parse(f.identifier()), Some(f));
        }
        assert_eq!(Format::parse("number"), Some(Format::Number));
        assert_eq!(Format::parse("TABLE"), None);
    }

    #[test]
    fn accepts_matches_value_format() {
        assert!(Format::Number.accepts(&Value::Number(1.0)));
        assert!(!Format::Number.accepts(&Value::Text("1".into())));
        assert!(!Format::Text.accepts(&Value::Empty));
    }
}
