//! In-memory predicate evaluation against cell values.
//!
//! A [`Matcher`] is a validated `(column, operator, operands)` triple ready
//! to test cells. Construction fails for operator/type combinations that
//! cannot be evaluated, so callers never mistake an unsupported filter for
//! an empty result.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};

use crate::error::{ModelError, Result};
use crate::field_type::FieldType;
use crate::operator::Operator;
use crate::value::{TypedValue, Value};

/// A compiled, type-checked predicate over one column.
#[derive(Debug, Clone)]
pub struct Matcher {
    column: String,
    field_type: FieldType,
    operator: Operator,
    operands: Vec<String>,
    typed_operands: Vec<Value>,
    regex: Option<Regex>,
    case_sensitive: bool,
}

impl Matcher {
    /// Builds a matcher, checking that `operator` is supported for
    /// `field_type` and that the operand count fits the operator.
    ///
    /// Supported combinations:
    ///
    /// | Type | Operators |
    /// |------|-----------|
    /// | Text, Undefined | `Equal`, `Contains`, `StartsWith`, `EndsWith`, `Regex`, `Empty`, `NotEmpty` |
    /// | Numeric, temporal | the six ordering operators, `Between`, `BetweenInclusive`, `Empty`, `NotEmpty` |
    /// | Boolean | `Equal`, `NotEqual`, `Empty`, `NotEmpty` |
    pub fn new(
        column: &str,
        field_type: FieldType,
        operator: Operator,
        operands: Vec<String>,
        case_sensitive: bool,
    ) -> Result<Self> {
        if !is_supported(field_type, operator) {
            return Err(ModelError::UnsupportedFind {
                column: column.to_string(),
                operator,
                field_type,
            });
        }

        let expected = operand_count(operator);
        if operands.len() != expected {
            return Err(ModelError::MissingOperand {
                column: column.to_string(),
                operator,
                expected,
                actual: operands.len(),
            });
        }

        let regex = if operator == Operator::Regex {
            Some(
                RegexBuilder::new(&operands[0])
                    .case_insensitive(!case_sensitive)
                    .build()?,
            )
        } else {
            None
        };

        let typed_operands = if field_type.is_numeric()
            || field_type.is_temporal()
            || field_type.is_boolean()
        {
            operands
                .iter()
                .map(|text| match Value::parse(text, field_type) {
                    Value::Null => Err(ModelError::InvalidOperand {
                        column: column.to_string(),
                        field_type,
                        value: text.clone(),
                    }),
                    value => Ok(value),
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let operands = if case_sensitive {
            operands
        } else {
            operands.iter().map(|s| s.to_lowercase()).collect()
        };

        Ok(Matcher {
            column: column.to_string(),
            field_type,
            operator,
            operands,
            typed_operands,
            regex,
            case_sensitive,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Tests a cell. Presence operators look at the whole cell; all others
    /// match if any non-empty value in the cell satisfies the predicate.
    pub fn matches(&self, cell: &TypedValue) -> bool {
        match self.operator {
            Operator::Empty => return cell.is_empty(),
            Operator::NotEmpty => return !cell.is_empty(),
            _ => {}
        }
        cell.values()
            .iter()
            .filter(|v| !v.is_empty())
            .any(|v| self.matches_value(v))
    }

    fn matches_value(&self, text: &str) -> bool {
        if self.field_type.is_text() || self.field_type == FieldType::Undefined {
            return self.match_text(text);
        }
        let value = Value::parse(text, self.field_type);
        if value.is_null() {
            return false;
        }
        match self.operator {
            Operator::Between => {
                self.cmp_operand(&value, 0) == Some(Ordering::Greater)
                    && self.cmp_operand(&value, 1) == Some(Ordering::Less)
            }
            Operator::BetweenInclusive => {
                matches!(
                    self.cmp_operand(&value, 0),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    self.cmp_operand(&value, 1),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }
            op => self
                .cmp_operand(&value, 0)
                .is_some_and(|ordering| op.eval_ordering(ordering)),
        }
    }

    fn cmp_operand(&self, value: &Value, offset: usize) -> Option<Ordering> {
        value.compare(self.typed_operands.get(offset)?)
    }

    fn match_text(&self, text: &str) -> bool {
        if let Some(regex) = &self.regex {
            return regex.is_match(text);
        }
        let folded;
        let text = if self.case_sensitive {
            text
        } else {
            folded = text.to_lowercase();
            &folded
        };
        let pattern = self.operands[0].as_str();
        match self.operator {
            Operator::Equal => text == pattern,
            Operator::Contains => text.contains(pattern),
            Operator::StartsWith => text.starts_with(pattern),
            Operator::EndsWith => text.ends_with(pattern),
            _ => false,
        }
    }
}

fn is_supported(field_type: FieldType, operator: Operator) -> bool {
    match field_type {
        FieldType::Text | FieldType::Undefined => matches!(
            operator,
            Operator::Equal
                | Operator::Contains
                | Operator::StartsWith
                | Operator::EndsWith
                | Operator::Regex
                | Operator::Empty
                | Operator::NotEmpty
        ),
        FieldType::Boolean => matches!(
            operator,
            Operator::Equal | Operator::NotEqual | Operator::Empty | Operator::NotEmpty
        ),
        _ => {
            operator.is_ordering()
                || matches!(
                    operator,
                    Operator::Between
                        | Operator::BetweenInclusive
                        | Operator::Empty
                        | Operator::NotEmpty
                )
        }
    }
}

fn operand_count(operator: Operator) -> usize {
    match operator {
        Operator::Empty | Operator::NotEmpty => 0,
        Operator::Between | Operator::BetweenInclusive => 2,
        _ => 1,
    }
}
