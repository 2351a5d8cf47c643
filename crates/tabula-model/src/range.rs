//! Validation ranges.
//!
//! Numeric and date-time ranges are exclusive on both bounds; enumerated
//! text ranges use plain membership. The asymmetry is long-standing
//! behaviour that persisted schemas depend on.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::field_type::FieldType;
use crate::format;

/// Allowed values for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Range {
    /// Enumerated allow-list for Text fields.
    Text(Vec<String>),
    Integer { min: i32, max: i32 },
    Long { min: i64, max: i64 },
    Double { min: f64, max: f64 },
    DateTime { min: NaiveDateTime, max: NaiveDateTime },
}

impl Range {
    pub fn text<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Range::Text(items.into_iter().map(Into::into).collect())
    }

    pub fn integer(min: i32, max: i32) -> Self {
        Range::Integer { min, max }
    }

    pub fn long(min: i64, max: i64) -> Self {
        Range::Long { min, max }
    }

    pub fn double(min: f64, max: f64) -> Self {
        Range::Double { min, max }
    }

    pub fn date_time(min: NaiveDateTime, max: NaiveDateTime) -> Self {
        Range::DateTime { min, max }
    }

    /// Field type this range is declared for.
    pub fn field_type(&self) -> FieldType {
        match self {
            Range::Text(_) => FieldType::Text,
            Range::Integer { .. } => FieldType::Integer,
            Range::Long { .. } => FieldType::Long,
            Range::Double { .. } => FieldType::Double,
            Range::DateTime { .. } => FieldType::DateTime,
        }
    }

    /// Checks one canonical string against the range.
    ///
    /// Values that do not parse under the range's type are invalid.
    pub fn is_valid(&self, value: &str) -> bool {
        match self {
            Range::Text(items) => items.iter().any(|item| item == value),
            Range::Integer { min, max } => {
                format::parse_i32(value).is_some_and(|v| v > *min && v < *max)
            }
            Range::Long { min, max } => {
                format::parse_i64(value).is_some_and(|v| v > *min && v < *max)
            }
            Range::Double { min, max } => {
                format::parse_f64(value).is_some_and(|v| v > *min && v < *max)
            }
            Range::DateTime { min, max } => {
                format::parse_date_time(value).is_some_and(|v| v > *min && v < *max)
            }
        }
    }
}

/// Human-readable description used in validation messages.
impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Text(items) => write!(f, "one of [{}]", items.join(", ")),
            Range::Integer { min, max } => write!(f, "between {min} and {max}"),
            Range::Long { min, max } => write!(f, "between {min} and {max}"),
            Range::Double { min, max } => write!(f, "between {min} and {max}"),
            Range::DateTime { min, max } => write!(
                f,
                "between {} and {}",
                format::format_temporal(min, FieldType::DateTime),
                format::format_temporal(max, FieldType::DateTime)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn integer_bounds_are_exclusive() {
        let range = Range::integer(5, 10);
        assert!(!range.is_valid("5"));
        assert!(range.is_valid("7"));
        assert!(!range.is_valid("10"));
        assert!(!range.is_valid("seven"));
    }

    #[test]
    fn long_and_double_bounds() {
        assert!(Range::long(0, 3_000_000_000).is_valid("2999999999"));
        assert!(!Range::long(0, 10).is_valid("0"));
        assert!(Range::double(0.0, 1.0).is_valid("0.5"));
        assert!(!Range::double(0.0, 1.0).is_valid("1.0"));
    }

    #[test]
    fn date_time_bounds() {
        let min = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let max = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let range = Range::date_time(min, max);
        assert!(range.is_valid("2024-06-15"));
        assert!(!range.is_valid("2024-01-01T00:00:00"));
        assert!(!range.is_valid("2025-01-01"));
    }

    #[test]
    fn text_membership_is_inclusive() {
        let range = Range::text(["low", "medium", "high"]);
        assert!(range.is_valid("low"));
        assert!(range.is_valid("high"));
        assert!(!range.is_valid("LOW"));
        assert!(!range.is_valid("extreme"));
    }

    #[test]
    fn display_and_type() {
        assert_eq!(Range::integer(1, 9).to_string(), "between 1 and 9");
        assert_eq!(Range::text(["a", "b"]).to_string(), "one of [a, b]");
        assert_eq!(Range::double(0.0, 1.0).field_type(), FieldType::Double);
    }
}
