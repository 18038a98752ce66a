//! Enum members and the identifiers used to look them up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A named numeric member of an enum definition.
///
/// `owner` names the definition the value belongs to. It is a lookup
/// convenience only; the definition owns its values, not the other way round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    /// Uppercase symbolic name.
    pub name: String,
    /// Storage representation.
    pub value: i64,
    /// Name of the owning enum definition.
    pub owner: Arc<str>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, value: i64, owner: Arc<str>) -> Self {
        Self {
            name: name.into(),
            value,
            owner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Either a numeric value or a symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    Value(i64),
    Name(&'a str),
}

impl From<i64> for Identifier<'_> {
    fn from(v: i64) -> Self {
        Identifier::Value(v)
    }
}

impl From<i32> for Identifier<'_> {
    fn from(v: i32) -> Self {
        Identifier::Value(i64::from(v))
    }
}

impl<'a> From<&'a str> for Identifier<'a> {
    fn from(s: &'a str) -> Self {
        Identifier::Name(s)
    }
}

impl<'a> From<&'a String> for Identifier<'a> {
    fn from(s: &'a String) -> Self {
        Identifier::Name(s.as_str())
    }
}

impl<'a> Identifier<'a> {
    /// Parses command-line style input: integers are values, anything else a name.
    pub fn parse(s: &'a str) -> Self {
        match s.trim().parse::<i64>() {
            Ok(v) => Identifier::Value(v),
            Err(_) => Identifier::Name(s.trim()),
        }
    }
}

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Value(v) => write!(f, "{}", v),
            Identifier::Name(n) => f.write_str(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_name() {
        let v = EnumValue::new("STOUT", 1, Arc::from("BeerStyle"));
        assert_eq!(v.to_string(), "STOUT");
        assert_eq!(v.owner(), "BeerStyle");
    }

    #[test]
    fn test_identifier_parse() {
        assert_eq!(Identifier::parse("2"), Identifier::Value(2));
        assert_eq!(Identifier::parse("-1"), Identifier::Value(-1));
        assert_eq!(Identifier::parse(" stout "), Identifier::Name("stout"));
    }
}
