//! Comparison operators for filter entries.
//!
//! The [`Operator`] enum is shared by in-memory table searches and the SQL
//! predicate compiler. Not every operator is valid for every field type; the
//! consumers decide which combinations they accept.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Operator of a filter entry.
///
/// Operators fall into groups:
/// - **Ordering**: `Equal`, `NotEqual`, `GreaterThan`, `GreaterThanEqual`,
///   `LessThan`, `LessThanEqual`
/// - **Substring**: `Contains`, `StartsWith`, `EndsWith` and their negations
/// - **Range**: `Between` (exclusive), `NotBetween`, `BetweenInclusive`
/// - **Set**: `In`, `NotIn`
/// - **Presence**: `Empty`, `NotEmpty`
/// - **Other**: `Regex`, `And`, `Or`, `Sort`, `Undefined`
///
/// `And` and `Or` exist so persisted criteria carrying them can be read back;
/// no grouping semantics are attached to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    Between,
    NotBetween,
    BetweenInclusive,
    Regex,
    Empty,
    NotEmpty,
    And,
    Or,
    In,
    NotIn,
    Sort,
    #[default]
    Undefined,
}

impl Operator {
    /// All variants, in declaration order.
    pub const ALL: [Operator; 24] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::GreaterThanEqual,
        Operator::LessThan,
        Operator::LessThanEqual,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::NotStartsWith,
        Operator::EndsWith,
        Operator::NotEndsWith,
        Operator::Between,
        Operator::NotBetween,
        Operator::BetweenInclusive,
        Operator::Regex,
        Operator::Empty,
        Operator::NotEmpty,
        Operator::And,
        Operator::Or,
        Operator::In,
        Operator::NotIn,
        Operator::Sort,
        Operator::Undefined,
    ];

    /// Returns `true` for the six operators decided by an [`Ordering`].
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::GreaterThan
                | Operator::GreaterThanEqual
                | Operator::LessThan
                | Operator::LessThanEqual
        )
    }

    /// Returns `true` for the three range operators.
    pub fn is_range(self) -> bool {
        matches!(
            self,
            Operator::Between | Operator::NotBetween | Operator::BetweenInclusive
        )
    }

    /// Returns `true` for `In` and `NotIn`.
    pub fn is_set(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Returns `true` for operators that take no comparison value.
    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Empty | Operator::NotEmpty)
    }

    /// Evaluates an ordering-based operator given `field.cmp(operand)`.
    ///
    /// Non-ordering operators evaluate to `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanEqual => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the serialization token of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "Equal",
            Operator::NotEqual => "NotEqual",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanEqual => "GreaterThanEqual",
            Operator::LessThan => "LessThan",
            Operator::LessThanEqual => "LessThanEqual",
            Operator::Contains => "Contains",
            Operator::NotContains => "NotContains",
            Operator::StartsWith => "StartsWith",
            Operator::NotStartsWith => "NotStartsWith",
            Operator::EndsWith => "EndsWith",
            Operator::NotEndsWith => "NotEndsWith",
            Operator::Between => "Between",
            Operator::NotBetween => "NotBetween",
            Operator::BetweenInclusive => "BetweenInclusive",
            Operator::Regex => "Regex",
            Operator::Empty => "Empty",
            Operator::NotEmpty => "NotEmpty",
            Operator::And => "And",
            Operator::Or => "Or",
            Operator::In => "In",
            Operator::NotIn => "NotIn",
            Operator::Sort => "Sort",
            Operator::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ModelError::UnknownToken {
                kind: "operator",
                token: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_groups() {
        assert!(Operator::Equal.is_ordering());
        assert!(Operator::LessThanEqual.is_ordering());
        assert!(!Operator::Contains.is_ordering());

        assert!(Operator::BetweenInclusive.is_range());
        assert!(!Operator::In.is_range());

        assert!(Operator::NotIn.is_set());
        assert!(Operator::Empty.is_unary());
        assert!(!Operator::Equal.is_unary());
    }

    #[test]
    fn operator_eval_ordering() {
        assert!(Operator::Equal.eval_ordering(Ordering::Equal));
        assert!(!Operator::Equal.eval_ordering(Ordering::Less));

        assert!(Operator::NotEqual.eval_ordering(Ordering::Greater));
        assert!(!Operator::NotEqual.eval_ordering(Ordering::Equal));

        assert!(Operator::GreaterThan.eval_ordering(Ordering::Greater));
        assert!(!Operator::GreaterThan.eval_ordering(Ordering::Equal));

        assert!(Operator::GreaterThanEqual.eval_ordering(Ordering::Equal));
        assert!(!Operator::GreaterThanEqual.eval_ordering(Ordering::Less));

        assert!(Operator::LessThan.eval_ordering(Ordering::Less));
        assert!(Operator::LessThanEqual.eval_ordering(Ordering::Equal));
        assert!(!Operator::LessThanEqual.eval_ordering(Ordering::Greater));

        assert!(!Operator::Contains.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn operator_tokens_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
        assert_eq!(Operator::GreaterThanEqual.to_string(), "GreaterThanEqual");
        assert!("gte".parse::<Operator>().is_err());
    }

    #[test]
    fn operator_serde_token() {
        let json = serde_json::to_string(&Operator::NotBetween).unwrap();
        assert_eq!(json, "\"NotBetween\"");
        let back: Operator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Operator::NotBetween);
    }
}
