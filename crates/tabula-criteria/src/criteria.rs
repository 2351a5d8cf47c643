//! Criteria: ordered, implicitly ANDed filter entries.
//!
//! Each [`CriterionEntry`] carries a [`Field`] (name, type and comparison
//! values), an [`Operator`], and a case-sensitivity flag. The same entries
//! drive SQL compilation and in-memory evaluation against records and
//! table rows.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use tabula_model::{
    Field, FieldType, Matcher, ModelError, Operator, Record, Row, Table, TypedValue, Value,
};

use crate::error::{CriteriaError, Result};

/// Comparison value(s) of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CriterionValue {
    /// No value, for `Empty` and `NotEmpty`.
    #[default]
    None,
    Single(String),
    Multi(Vec<String>),
}

// Conversions from common types to CriterionValue

impl From<String> for CriterionValue {
    fn from(s: String) -> Self {
        CriterionValue::Single(s)
    }
}

impl From<&str> for CriterionValue {
    fn from(s: &str) -> Self {
        CriterionValue::Single(s.to_string())
    }
}

impl From<i32> for CriterionValue {
    fn from(n: i32) -> Self {
        CriterionValue::Single(n.to_string())
    }
}

impl From<i64> for CriterionValue {
    fn from(n: i64) -> Self {
        CriterionValue::Single(n.to_string())
    }
}

impl From<f64> for CriterionValue {
    fn from(n: f64) -> Self {
        CriterionValue::Single(n.to_string())
    }
}

impl From<bool> for CriterionValue {
    fn from(b: bool) -> Self {
        CriterionValue::Single(b.to_string())
    }
}

impl From<Vec<String>> for CriterionValue {
    fn from(values: Vec<String>) -> Self {
        CriterionValue::Multi(values)
    }
}

impl From<Vec<&str>> for CriterionValue {
    fn from(values: Vec<&str>) -> Self {
        CriterionValue::Multi(values.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for CriterionValue {
    fn from(values: [&str; N]) -> Self {
        CriterionValue::Multi(values.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[i64; N]> for CriterionValue {
    fn from(values: [i64; N]) -> Self {
        CriterionValue::Multi(values.iter().map(|n| n.to_string()).collect())
    }
}

/// One filter entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionEntry {
    field: Field,
    operator: Operator,
    case_sensitive: bool,
}

impl CriterionEntry {
    /// Creates a case-sensitive entry, storing `value` into a copy of
    /// `field`.
    pub fn new(field: Field, operator: Operator, value: impl Into<CriterionValue>) -> Self {
        let mut field = field;
        match value.into() {
            CriterionValue::None => field.clear_value(),
            CriterionValue::Single(v) => field.set_value(v),
            CriterionValue::Multi(values) => field.set_values(values),
        }
        CriterionEntry {
            field,
            operator,
            case_sensitive: true,
        }
    }

    /// Compares text ignoring case.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn name(&self) -> &str {
        self.field.name()
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn values(&self) -> &[String] {
        self.field.get_values()
    }

    /// Fails unless the entry carries at least two values.
    pub(crate) fn require_multi_value(&self) -> Result<()> {
        if self.field.is_multi_value() && self.field.value_count() >= 2 {
            Ok(())
        } else {
            Err(CriteriaError::NotMultiValue {
                field: self.name().to_string(),
                operator: self.operator,
            })
        }
    }

    pub(crate) fn require_values(&self, expected: usize) -> Result<()> {
        let actual = self.field.value_count();
        if actual == expected {
            Ok(())
        } else {
            Err(CriteriaError::MissingOperand {
                field: self.name().to_string(),
                operator: self.operator,
                expected,
                actual,
            })
        }
    }

    fn evaluator(&self) -> Result<Evaluator> {
        if self.operator.is_set() {
            self.require_multi_value()?;
            let negate = self.operator == Operator::NotIn;
            let field_type = self.field.field_type();
            if !matches!(field_type, FieldType::Text | FieldType::Undefined) {
                let values = self
                    .values()
                    .iter()
                    .map(|v| match Value::parse(v, field_type) {
                        Value::Null => Err(ModelError::InvalidOperand {
                            column: self.name().to_string(),
                            field_type,
                            value: v.clone(),
                        }
                        .into()),
                        value => Ok(value),
                    })
                    .collect::<Result<Vec<_>>>()?;
                return Ok(Evaluator::TypedSet {
                    values,
                    field_type,
                    negate,
                });
            }
            let fold = |s: &String| {
                if self.case_sensitive {
                    s.clone()
                } else {
                    s.to_lowercase()
                }
            };
            return Ok(Evaluator::Set {
                values: self.values().iter().map(fold).collect(),
                case_sensitive: self.case_sensitive,
                negate,
            });
        }

        let (operator, negate) = match self.operator {
            Operator::NotEqual if !self.field.field_type().is_boolean() => (Operator::Equal, true),
            Operator::NotContains => (Operator::Contains, true),
            Operator::NotStartsWith => (Operator::StartsWith, true),
            Operator::NotEndsWith => (Operator::EndsWith, true),
            Operator::NotBetween => (Operator::Between, true),
            op => (op, false),
        };
        let operands = if operator.is_unary() {
            Vec::new()
        } else if operator.is_range() {
            self.values().to_vec()
        } else {
            vec![self.field.get_value().to_string()]
        };
        let matcher = Matcher::new(
            self.name(),
            self.field.field_type(),
            operator,
            operands,
            self.case_sensitive,
        )?;
        Ok(Evaluator::Matcher { matcher, negate })
    }
}

/// An entry prepared for repeated in-memory evaluation.
enum Evaluator {
    Matcher {
        matcher: Matcher,
        negate: bool,
    },
    Set {
        values: Vec<String>,
        case_sensitive: bool,
        negate: bool,
    },
    /// Membership by typed equality, so `07` is in `[7, 8]`.
    TypedSet {
        values: Vec<Value>,
        field_type: FieldType,
        negate: bool,
    },
}

impl Evaluator {
    fn matches(&self, cell: &TypedValue) -> bool {
        match self {
            Evaluator::Matcher { matcher, negate } => matcher.matches(cell) != *negate,
            Evaluator::Set {
                values,
                case_sensitive,
                negate,
            } => {
                let found = cell.values().iter().any(|v| {
                    if *case_sensitive {
                        values.contains(v)
                    } else {
                        values.contains(&v.to_lowercase())
                    }
                });
                found != *negate
            }
            Evaluator::TypedSet {
                values,
                field_type,
                negate,
            } => {
                let found = cell
                    .typed_values(*field_type)
                    .iter()
                    .filter(|v| !v.is_null())
                    .any(|v| values.iter().any(|w| v.compare(w) == Some(Ordering::Equal)));
                found != *negate
            }
        }
    }
}

/// An ordered list of entries, combined with AND.
///
/// # Example
///
/// ```
/// use tabula_criteria::Criteria;
/// use tabula_model::{Field, Operator, Record};
///
/// let criteria = Criteria::new("adults")
///     .add(Field::integer("age"), Operator::GreaterThanEqual, 18)
///     .add_ignore_case(Field::text("status"), Operator::Equal, "ACTIVE");
///
/// let person = Record::new("person")
///     .with_field(Field::integer("age").with_value("30"))
///     .with_field(Field::text("status").with_value("active"));
///
/// assert!(criteria.matches(&person).unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    name: String,
    entries: Vec<CriterionEntry>,
}

impl Criteria {
    pub fn new(name: impl Into<String>) -> Self {
        Criteria {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Adds a case-sensitive entry.
    pub fn add(mut self, field: Field, operator: Operator, value: impl Into<CriterionValue>) -> Self {
        self.entries.push(CriterionEntry::new(field, operator, value));
        self
    }

    /// Adds an entry comparing text ignoring case.
    pub fn add_ignore_case(
        mut self,
        field: Field,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Self {
        self.entries
            .push(CriterionEntry::new(field, operator, value).case_insensitive());
        self
    }

    /// Adds an entry for a field of `record`, looked up by name.
    pub fn add_from(
        self,
        record: &Record,
        name: &str,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        let field = record
            .get_by_name(name)
            .ok_or_else(|| ModelError::FieldNotFound {
                name: name.to_string(),
            })?
            .clone();
        Ok(self.add(field, operator, value))
    }

    pub fn push(&mut self, entry: CriterionEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CriterionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CriterionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // In-memory evaluation
    // ========================================================================

    /// Returns `true` if `record` satisfies every entry.
    ///
    /// Entries name record fields; a missing field is an error.
    pub fn matches(&self, record: &Record) -> Result<bool> {
        for entry in &self.entries {
            let field = record
                .get_by_name(entry.name())
                .ok_or_else(|| ModelError::FieldNotFound {
                    name: entry.name().to_string(),
                })?;
            if !entry.evaluator()?.matches(field.typed_value()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Evaluates the criteria against one table row.
    ///
    /// Out-of-range rows never match.
    pub fn matches_row(&self, table: &Table, row: usize) -> Result<bool> {
        match table.row(row) {
            Some(row) => Ok(row_matches(&self.prepare(table)?, row)),
            None => Ok(false),
        }
    }

    /// Rows of `table` satisfying every entry, in table order.
    pub fn filter<'t>(&self, table: &'t Table) -> Result<Vec<&'t Row>> {
        let prepared = self.prepare(table)?;
        Ok(table
            .rows()
            .iter()
            .filter(|row| row_matches(&prepared, row))
            .collect())
    }

    fn prepare(&self, table: &Table) -> Result<Vec<(usize, Evaluator)>> {
        self.entries
            .iter()
            .map(|entry| -> Result<(usize, Evaluator)> {
                let col = table
                    .column_offset(entry.name())
                    .ok_or_else(|| ModelError::ColumnNotFound {
                        name: entry.name().to_string(),
                    })?;
                Ok((col, entry.evaluator()?))
            })
            .collect()
    }
}

fn row_matches(prepared: &[(usize, Evaluator)], row: &Row) -> bool {
    prepared
        .iter()
        .all(|(col, evaluator)| row.cell(*col).is_some_and(|cell| evaluator.matches(cell)))
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a CriterionEntry;
    type IntoIter = std::slice::Iter<'a, CriterionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
