//! Vendor-aware SQL predicate compiler.
//!
//! Each entry compiles to a fragment with a leading space, e.g.
//! `" (status = 'active')"`. The exact text is stable for a given vendor
//! and input, since compiled predicates are persisted and compared.
//!
//! Compiled text inlines escaped literals. Execute it only through layers
//! that treat it as trusted, or bind the entry values as parameters.
//!
//! | Type | Operators |
//! |------|-----------|
//! | Text | `Equal`, `NotEqual`, `Contains`, `NotContains`, `StartsWith`, `EndsWith`, `Empty`, `NotEmpty`, `In`, `NotIn` |
//! | Numeric, temporal | the six ordering operators, `Between`, `NotBetween`, `BetweenInclusive`, `In`, `NotIn` |
//! | Boolean | `Equal`, `NotEqual` |

use tabula_model::{format, FieldType, Operator, Record, SortOrder};

use crate::config::CompilerConfig;
use crate::criteria::{CriterionEntry, Criteria};
use crate::error::{CriteriaError, Result};
use crate::vendor::Vendor;

/// Compiles criteria entries into SQL text for one vendor.
#[derive(Debug, Clone, Default)]
pub struct PredicateCompiler {
    config: CompilerConfig,
}

impl PredicateCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        PredicateCompiler { config }
    }

    pub fn for_vendor(vendor: Vendor) -> Self {
        PredicateCompiler::new(CompilerConfig::new(vendor))
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn vendor(&self) -> Vendor {
        self.config.vendor
    }

    /// Compiles one entry.
    ///
    /// Dispatches on the entry field's type. Undefined types compile as
    /// text. Operators without a translation for the type are errors.
    ///
    /// `In`/`NotIn` lists are escaped but not quoted (`tags IN (a,b)`), so
    /// a value can still change the structure of the statement. Bind list
    /// values as parameters before executing the result.
    pub fn compile_predicate(&self, entry: &CriterionEntry) -> Result<String> {
        match self.compile_entry(entry) {
            Ok(sql) => {
                log::trace!("compiled '{}' {}:{}", entry.name(), entry.operator(), sql);
                Ok(sql)
            }
            Err(err) => {
                log::debug!("failed to compile '{}': {}", entry.name(), err);
                Err(err)
            }
        }
    }

    /// `WHERE` followed by every entry, joined with `AND`.
    ///
    /// Empty criteria compile to an empty string.
    pub fn compile_where(&self, criteria: &Criteria) -> Result<String> {
        if criteria.is_empty() {
            return Ok(String::new());
        }
        let fragments = criteria
            .iter()
            .map(|entry| self.compile_predicate(entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("WHERE{}", fragments.join(" AND")))
    }

    /// `ORDER BY` over every field with a defined sort order, in field order.
    ///
    /// Returns an empty string when no field is sorted.
    pub fn compile_order_by(&self, record: &Record) -> String {
        let terms: Vec<String> = record
            .iter()
            .filter(|f| f.sort_order().is_defined())
            .map(|f| {
                let direction = match f.sort_order() {
                    SortOrder::Descending => "DESC",
                    _ => "ASC",
                };
                format!("{} {}", self.identifier(f.name()), direction)
            })
            .collect();
        if terms.is_empty() {
            String::new()
        } else {
            format!(" ORDER BY {}", terms.join(", "))
        }
    }

    /// A full `SELECT` over the record's table.
    ///
    /// The record name is the table name and must not be empty. Fields are
    /// selected in record order (`*` for a record with no fields).
    pub fn compile_select(&self, record: &Record, criteria: Option<&Criteria>) -> Result<String> {
        if record.name().is_empty() {
            return Err(CriteriaError::MissingName { what: "record" });
        }
        let columns = if record.is_empty() {
            "*".to_string()
        } else {
            record
                .iter()
                .map(|f| self.identifier(f.name()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", columns, self.identifier(record.name()));
        if let Some(criteria) = criteria.filter(|c| !c.is_empty()) {
            sql.push(' ');
            sql.push_str(&self.compile_where(criteria)?);
        }
        sql.push_str(&self.compile_order_by(record));
        Ok(sql)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn compile_entry(&self, entry: &CriterionEntry) -> Result<String> {
        if entry.name().is_empty() {
            return Err(CriteriaError::MissingName { what: "field" });
        }
        let field_type = entry.field().field_type();
        match field_type {
            FieldType::Text | FieldType::Undefined => self.compile_text(entry),
            FieldType::Boolean => self.compile_boolean(entry),
            _ => self.compile_ordered(entry, field_type),
        }
    }

    fn compile_text(&self, entry: &CriterionEntry) -> Result<String> {
        let col = self.identifier(entry.name());
        let vendor = self.vendor();
        let op = entry.operator();

        match op {
            Operator::Empty => return Ok(format!(" (({col} IS NULL) OR ({col} = ''))")),
            Operator::NotEmpty => return Ok(format!(" (({col} IS NOT NULL) AND ({col} <> ''))")),
            Operator::In | Operator::NotIn => {
                entry.require_multi_value()?;
                let values: Vec<String> = entry.values().iter().map(|v| vendor.escape(v)).collect();
                return Ok(set_clause(&col, op, &values));
            }
            _ => {}
        }

        let (sql_op, pattern) = match op {
            Operator::Equal => ("=", "{}"),
            Operator::NotEqual => ("<>", "{}"),
            Operator::Contains => ("LIKE", "%{}%"),
            Operator::NotContains => ("NOT LIKE", "%{}%"),
            Operator::StartsWith => ("LIKE", "{}%"),
            Operator::EndsWith => ("LIKE", "%{}"),
            _ => return Err(unsupported(entry)),
        };
        entry.require_values(1)?;

        let literal = vendor.quote(&pattern.replace("{}", entry.field().get_value()));
        if entry.is_case_sensitive() {
            Ok(format!(" ({col} {sql_op} {literal})"))
        } else {
            Ok(format!(" (LOWER({col}) {sql_op} LOWER({literal}))"))
        }
    }

    fn compile_boolean(&self, entry: &CriterionEntry) -> Result<String> {
        let sql_op = match entry.operator() {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            _ => return Err(unsupported(entry)),
        };
        entry.require_values(1)?;
        let text = entry.field().get_value();
        let value = format::parse_bool(text).ok_or_else(|| invalid(entry, text))?;
        let literal = self.config.boolean_style().literal(value);
        Ok(format!(" ({} {} {})", self.identifier(entry.name()), sql_op, literal))
    }

    /// Numeric and temporal types share one operator set and differ only
    /// in how literals are written.
    fn compile_ordered(&self, entry: &CriterionEntry, field_type: FieldType) -> Result<String> {
        let col = self.identifier(entry.name());
        let op = entry.operator();
        let literal = |text: &str| self.literal(entry, field_type, text);

        let sql = match op {
            Operator::In | Operator::NotIn => {
                entry.require_multi_value()?;
                let values = entry
                    .values()
                    .iter()
                    .map(|v| literal(v))
                    .collect::<Result<Vec<_>>>()?;
                set_clause(&col, op, &values)
            }
            Operator::Between | Operator::NotBetween | Operator::BetweenInclusive => {
                entry.require_values(2)?;
                let lo = literal(&entry.values()[0])?;
                let hi = literal(&entry.values()[1])?;
                match op {
                    Operator::Between => format!(" (({col} > {lo}) AND ({col} < {hi}))"),
                    Operator::NotBetween => format!(" (({col} <= {lo}) OR ({col} >= {hi}))"),
                    _ => format!(" (({col} >= {lo}) AND ({col} <= {hi}))"),
                }
            }
            _ => {
                let sql_op = comparison(op).ok_or_else(|| unsupported(entry))?;
                entry.require_values(1)?;
                let value = literal(entry.field().get_value())?;
                format!(" ({col} {sql_op} {value})")
            }
        };
        Ok(sql)
    }

    // ========================================================================
    // Literals and identifiers
    // ========================================================================

    fn literal(&self, entry: &CriterionEntry, field_type: FieldType, text: &str) -> Result<String> {
        let formatted = if field_type.is_temporal() {
            format::parse_date_time(text).map(|dt| self.vendor().timestamp_literal(&dt))
        } else if field_type.is_integral() {
            format::parse_i64(text).map(|n| n.to_string())
        } else {
            format::parse_f64(text)
                .filter(|n| n.is_finite())
                .map(|n| n.to_string())
        };
        formatted.ok_or_else(|| invalid(entry, text))
    }

    fn identifier(&self, name: &str) -> String {
        self.config.identifier_case.apply(name)
    }
}

fn comparison(op: Operator) -> Option<&'static str> {
    match op {
        Operator::Equal => Some("="),
        Operator::NotEqual => Some("<>"),
        Operator::GreaterThan => Some(">"),
        Operator::GreaterThanEqual => Some(">="),
        Operator::LessThan => Some("<"),
        Operator::LessThanEqual => Some("<="),
        _ => None,
    }
}

fn set_clause(col: &str, op: Operator, values: &[String]) -> String {
    let keyword = if op == Operator::NotIn { "NOT IN" } else { "IN" };
    format!(" {} {} ({})", col, keyword, values.join(","))
}

fn unsupported(entry: &CriterionEntry) -> CriteriaError {
    CriteriaError::UnsupportedOperator {
        field: entry.name().to_string(),
        operator: entry.operator(),
        field_type: entry.field().field_type(),
    }
}

fn invalid(entry: &CriterionEntry, text: &str) -> CriteriaError {
    CriteriaError::InvalidLiteral {
        field: entry.name().to_string(),
        field_type: entry.field().field_type(),
        value: text.to_string(),
    }
}
