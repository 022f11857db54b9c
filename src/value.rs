use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static type of an expression subtree, fixed while a filter is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affinity {
    #[default]
    #[serde(alias = "UNKNOWN")]
    Unknown,
    #[serde(alias = "BOOLEAN")]
    Boolean,
    #[serde(alias = "INTEGER")]
    Integer,
    #[serde(alias = "DOUBLE")]
    Double,
    #[serde(alias = "STRING")]
    String,
}

impl Affinity {
    pub fn is_known(&self) -> bool {
        *self != Affinity::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Affinity::Unknown => "UNKNOWN",
            Affinity::Boolean => "BOOLEAN",
            Affinity::Integer => "INTEGER",
            Affinity::Double => "DOUBLE",
            Affinity::String => "STRING",
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Affinity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" => Ok(Affinity::Unknown),
            "boolean" | "bool" => Ok(Affinity::Boolean),
            "integer" | "int" => Ok(Affinity::Integer),
            "double" | "float" => Ok(Affinity::Double),
            "string" | "text" => Ok(Affinity::String),
            _ => bail!("Unknown affinity: {}", s),
        }
    }
}

/// Runtime value of a cell, a literal, or an evaluation result.
///
/// Variants order by tag first (in declaration order) and then by value, so
/// comparing a `None` cell against a typed value is well defined.
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variant {
    #[default]
    None,
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
}

/// A row is positionally aligned with the header it is evaluated against
pub type Row = Vec<Variant>;

impl Variant {
    /// Get the affinity matching this value's tag
    pub fn affinity(&self) -> Affinity {
        match self {
            Variant::None => Affinity::Unknown,
            Variant::String(_) => Affinity::String,
            Variant::Integer(_) => Affinity::Integer,
            Variant::Double(_) => Affinity::Double,
            Variant::Boolean(_) => Affinity::Boolean,
        }
    }

    /// Check if this value can be stored in a column of the given affinity
    pub fn is_compatible_with(&self, affinity: Affinity) -> bool {
        match (self, affinity) {
            (Variant::None, _) => true,
            (_, Affinity::Unknown) => true,
            (value, affinity) => value.affinity() == affinity,
        }
    }

    /// Convert a raw cell to the given column affinity.
    ///
    /// Integers widen to doubles; every other mismatch is rejected.
    pub fn conform(self, affinity: Affinity) -> Result<Variant> {
        match (self, affinity) {
            (Variant::Integer(i), Affinity::Double) => Ok(Variant::Double(i as f64)),
            (value, affinity) if value.is_compatible_with(affinity) => Ok(value),
            (value, affinity) => bail!("Value {} is not compatible with affinity {}", value, affinity),
        }
    }

    pub fn expect_bool(&self) -> bool {
        match self {
            Variant::Boolean(b) => *b,
            other => panic!("expected a BOOLEAN value, found {:?}", other),
        }
    }

    pub fn expect_double(&self) -> f64 {
        match self {
            Variant::Double(d) => *d,
            other => panic!("expected a DOUBLE value, found {:?}", other),
        }
    }

    pub fn expect_str(&self) -> &str {
        match self {
            Variant::String(s) => s,
            other => panic!("expected a STRING value, found {:?}", other),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::None => write!(f, "null"),
            Variant::String(s) => write!(f, "{}", s),
            Variant::Integer(i) => write!(f, "{}", i),
            Variant::Double(d) => write!(f, "{}", d),
            Variant::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Boolean(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Integer(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Double(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_from_str() -> Result<()> {
        assert_eq!("integer".parse::<Affinity>()?, Affinity::Integer);
        assert_eq!("DOUBLE".parse::<Affinity>()?, Affinity::Double);
        assert_eq!("Bool".parse::<Affinity>()?, Affinity::Boolean);
        assert_eq!("text".parse::<Affinity>()?, Affinity::String);
        assert!("decimal".parse::<Affinity>().is_err());
        Ok(())
    }

    #[test]
    fn test_affinity_display() {
        assert_eq!(Affinity::Unknown.to_string(), "UNKNOWN");
        assert_eq!(Affinity::Boolean.to_string(), "BOOLEAN");
        assert_eq!(Affinity::String.to_string(), "STRING");
    }

    #[test]
    fn test_variant_affinity() {
        assert_eq!(Variant::None.affinity(), Affinity::Unknown);
        assert_eq!(Variant::from("a").affinity(), Affinity::String);
        assert_eq!(Variant::from(1i64).affinity(), Affinity::Integer);
        assert_eq!(Variant::from(1.5).affinity(), Affinity::Double);
        assert_eq!(Variant::from(true).affinity(), Affinity::Boolean);
    }

    #[test]
    fn test_value_compatibility() {
        assert!(Variant::None.is_compatible_with(Affinity::Integer));
        assert!(Variant::Boolean(true).is_compatible_with(Affinity::Boolean));
        assert!(Variant::Integer(42).is_compatible_with(Affinity::Integer));
        assert!(Variant::String("hello".to_string()).is_compatible_with(Affinity::String));

        assert!(!Variant::Boolean(true).is_compatible_with(Affinity::Integer));
        assert!(!Variant::Integer(42).is_compatible_with(Affinity::Double));
    }

    #[test]
    fn test_conform_widens_integers() -> Result<()> {
        assert_eq!(Variant::Integer(3).conform(Affinity::Double)?, Variant::Double(3.0));
        assert_eq!(Variant::Integer(3).conform(Affinity::Integer)?, Variant::Integer(3));
        assert_eq!(Variant::None.conform(Affinity::String)?, Variant::None);
        assert!(Variant::Double(3.5).conform(Affinity::Integer).is_err());
        assert!(Variant::from("3").conform(Affinity::Integer).is_err());
        Ok(())
    }

    #[test]
    fn test_ordering_is_tag_first() {
        assert!(Variant::Integer(1) < Variant::Integer(2));
        assert!(Variant::from("abc") < Variant::from("abd"));
        assert!(Variant::Boolean(false) < Variant::Boolean(true));
        assert!(Variant::None < Variant::Integer(i64::MIN));
        assert!(Variant::String("zzz".into()) < Variant::Integer(0));
    }

    #[test]
    fn test_json_round_trip() -> Result<()> {
        let row: Row = serde_json::from_str(r#"[null, "a", 3, 2.5, true]"#)?;
        assert_eq!(
            row,
            vec![
                Variant::None,
                Variant::String("a".into()),
                Variant::Integer(3),
                Variant::Double(2.5),
                Variant::Boolean(true),
            ]
        );
        assert_eq!(serde_json::to_string(&row)?, r#"[null,"a",3,2.5,true]"#);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "expected a DOUBLE value")]
    fn test_expect_double_panics_on_mismatch() {
        Variant::Integer(1).expect_double();
    }
}
