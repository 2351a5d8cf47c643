//! Field types and sort preferences.
//!
//! The string tokens produced by [`FieldType::as_str`] and
//! [`SortOrder::as_str`] are persisted by serialization layers and must not
//! change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Declared type of a field. Drives parsing, comparison and literal
/// formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Date,
    Time,
    DateTime,
    #[default]
    Undefined,
}

impl FieldType {
    /// All variants, in declaration order.
    pub const ALL: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Integer,
        FieldType::Long,
        FieldType::Float,
        FieldType::Double,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::Undefined,
    ];

    /// Returns `true` for Integer and Long.
    pub fn is_integral(self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Long)
    }

    /// Returns `true` for Integer, Long, Float and Double.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Long | FieldType::Float | FieldType::Double
        )
    }

    /// Returns `true` for Date, Time and DateTime.
    pub fn is_temporal(self) -> bool {
        matches!(self, FieldType::Date | FieldType::Time | FieldType::DateTime)
    }

    /// Returns `true` for Text.
    pub fn is_text(self) -> bool {
        matches!(self, FieldType::Text)
    }

    /// Returns `true` for Boolean.
    pub fn is_boolean(self) -> bool {
        matches!(self, FieldType::Boolean)
    }

    /// Returns the serialization token of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Integer => "Integer",
            FieldType::Long => "Long",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
            FieldType::Boolean => "Boolean",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::DateTime => "DateTime",
            FieldType::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownToken {
                kind: "field type",
                token: s.to_string(),
            })
    }
}

/// Sort preference attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Undefined,
    Ascending,
    Descending,
}

impl SortOrder {
    /// Returns `true` unless this is `Undefined`.
    pub fn is_defined(self) -> bool {
        !matches!(self, SortOrder::Undefined)
    }

    /// Applies this order to an ascending comparison result.
    ///
    /// `Undefined` leaves the ordering unchanged.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Descending => ordering.reverse(),
            _ => ordering,
        }
    }

    /// Returns the serialization token of this order.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Undefined => "Undefined",
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Undefined" => Ok(SortOrder::Undefined),
            "Ascending" => Ok(SortOrder::Ascending),
            "Descending" => Ok(SortOrder::Descending),
            _ => Err(ModelError::UnknownToken {
                kind: "sort order",
                token: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn type_families() {
        assert!(FieldType::Integer.is_integral());
        assert!(FieldType::Long.is_numeric());
        assert!(FieldType::Double.is_numeric());
        assert!(!FieldType::Double.is_integral());
        assert!(FieldType::Time.is_temporal());
        assert!(!FieldType::Text.is_numeric());
        assert!(FieldType::Boolean.is_boolean());
    }

    #[test]
    fn type_tokens_round_trip() {
        for t in FieldType::ALL {
            assert_eq!(t.as_str().parse::<FieldType>().unwrap(), t);
        }
        assert_eq!(FieldType::DateTime.to_string(), "DateTime");
        assert!("datetime".parse::<FieldType>().is_err());
    }

    #[test]
    fn sort_order_apply() {
        assert_eq!(SortOrder::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Undefined.apply(Ordering::Greater), Ordering::Greater);
        assert!(!SortOrder::Undefined.is_defined());
    }

    #[test]
    fn sort_order_tokens() {
        assert_eq!("Descending".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert!("desc".parse::<SortOrder>().is_err());
    }

    #[test]
    fn serde_uses_tokens() {
        let json = serde_json::to_string(&FieldType::DateTime).unwrap();
        assert_eq!(json, "\"DateTime\"");
    }
}
