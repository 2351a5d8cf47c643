//! Tables: a column schema plus rows of aligned cells.
//!
//! The schema is a [`Record`]: field order is column order and field count
//! is column count. Every committed [`Row`] has exactly one cell per column.
//! Once a row exists the schema is frozen, except that a column's field is
//! marked assigned whenever a committed row carries a value in it.
//!
//! Rows are appended in two steps: stage with [`Table::new_row`], then
//! commit with [`Table::add_row`]. A staged row that is never committed is
//! not part of the table.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::Field;
use crate::field_type::SortOrder;
use crate::hash::ContentHasher;
use crate::matcher::Matcher;
use crate::operator::Operator;
use crate::ordering::compare_cells_in;
use crate::record::Record;
use crate::value::TypedValue;

/// One table row: a fixed-width array of cells aligned to the columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<TypedValue>,
}

impl Row {
    /// Creates a row from raw cells. Width is checked on commit.
    pub fn from_cells(cells: Vec<TypedValue>) -> Self {
        Row { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[TypedValue] {
        &self.cells
    }

    pub fn cell(&self, col: usize) -> Option<&TypedValue> {
        self.cells.get(col)
    }

    pub fn cell_mut(&mut self, col: usize) -> Option<&mut TypedValue> {
        self.cells.get_mut(col)
    }

    /// First value of the cell at `col`, or `""`.
    pub fn value(&self, col: usize) -> &str {
        self.cells.get(col).map(TypedValue::first).unwrap_or("")
    }

    /// Sets the cell at `col`. Returns `false` if `col` is out of range.
    pub fn set_value(&mut self, col: usize, value: impl Into<String>) -> bool {
        match self.cells.get_mut(col) {
            Some(cell) => {
                cell.set(value);
                true
            }
            None => false,
        }
    }
}

/// Stages a row by column name before it is committed.
///
/// Writes to unknown column names are logged and ignored.
#[derive(Debug)]
pub struct RowBuilder<'a> {
    columns: &'a Record,
    row: Row,
}

impl<'a> RowBuilder<'a> {
    fn new(columns: &'a Record) -> Self {
        let cells = columns
            .iter()
            .map(|field| {
                if field.is_multi_value() {
                    TypedValue::new_multi()
                } else {
                    TypedValue::new()
                }
            })
            .collect();
        RowBuilder {
            columns,
            row: Row { cells },
        }
    }

    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        match self.columns.offset_of(name) {
            Some(col) => self.row.cells[col].set(value),
            None => log::warn!("row builder: no column '{}' in '{}'", name, self.columns.name()),
        }
        self
    }

    pub fn set_values<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.columns.offset_of(name) {
            Some(col) => self.row.cells[col].set_values(values),
            None => log::warn!("row builder: no column '{}' in '{}'", name, self.columns.name()),
        }
        self
    }

    pub fn set_at(mut self, col: usize, value: impl Into<String>) -> Self {
        if !self.row.set_value(col, value) {
            log::warn!("row builder: column offset {} out of range", col);
        }
        self
    }

    pub fn build(self) -> Row {
        self.row
    }
}

/// A column schema plus an ordered list of rows.
///
/// # Example
///
/// ```
/// use tabula_model::{Field, Operator, Record, SortOrder, Table};
///
/// let columns = Record::new("people")
///     .with_field(Field::text("name"))
///     .with_field(Field::integer("age"));
/// let mut table = Table::new(columns);
///
/// let row = table.new_row().set("name", "Ada").set("age", "36").build();
/// table.add_row(row).unwrap();
/// let row = table.new_row().set("name", "Alan").set("age", "41").build();
/// table.add_row(row).unwrap();
///
/// let older = table.find("age", Operator::GreaterThan, "40").unwrap();
/// assert_eq!(older.len(), 1);
///
/// table.sort_by_column("age", SortOrder::Descending);
/// assert_eq!(table.row(0).unwrap().value(0), "Alan");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Record,
    rows: Vec<Row>,
    sort_column: Option<String>,
    sort_order: SortOrder,
}

impl Table {
    pub fn new(columns: Record) -> Self {
        Table {
            columns,
            ..Table::default()
        }
    }

    pub fn name(&self) -> &str {
        self.columns.name()
    }

    pub fn columns(&self) -> &Record {
        &self.columns
    }

    /// Replaces the schema. Ignored once any row exists.
    pub fn set_columns(&mut self, columns: Record) -> bool {
        if !self.rows.is_empty() {
            log::warn!(
                "table '{}': column set ignored, {} rows already present",
                self.name(),
                self.rows.len()
            );
            return false;
        }
        self.columns = columns;
        true
    }

    /// Appends a column. Ignored once any row exists.
    pub fn add_column(&mut self, field: Field) -> bool {
        if !self.rows.is_empty() {
            log::warn!(
                "table '{}': column '{}' ignored, rows already present",
                self.name(),
                field.name()
            );
            return false;
        }
        self.columns.add(field);
        true
    }

    pub fn column_count(&self) -> usize {
        self.columns.count()
    }

    pub fn column(&self, col: usize) -> Option<&Field> {
        self.columns.get_by_offset(col)
    }

    pub fn column_offset(&self, name: &str) -> Option<usize> {
        self.columns.offset_of(name)
    }

    // ========================================================================
    // Rows
    // ========================================================================

    /// Stages a new row with one empty cell per column.
    pub fn new_row(&self) -> RowBuilder<'_> {
        RowBuilder::new(&self.columns)
    }

    /// Commits a row.
    ///
    /// Fails if the row width differs from the column count. Columns that
    /// receive a value are marked assigned.
    pub fn add_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.column_count() {
            return Err(ModelError::RowWidthMismatch {
                expected: self.column_count(),
                actual: row.len(),
            });
        }
        for (col, cell) in row.cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            if let Some(field) = self.columns.get_by_offset_mut(col) {
                field.typed_value_mut().mark_assigned();
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// Commits a row built from a record's fields, matched by name.
    ///
    /// Record fields with no matching column are skipped.
    pub fn add_record(&mut self, record: &Record) -> Result<()> {
        let mut row = self.new_row().build();
        for field in record {
            match self.columns.offset_of(field.name()) {
                Some(col) => row.cells[col] = field.typed_value().clone(),
                None => log::debug!(
                    "table '{}': skipping unmatched field '{}'",
                    self.name(),
                    field.name()
                ),
            }
        }
        self.add_row(row)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Live row for in-place updates.
    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        if index < self.rows.len() {
            Some(self.rows.remove(index))
        } else {
            None
        }
    }

    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    /// A copy of the column field carrying the cell's value.
    ///
    /// Mutating the returned field never affects the table.
    pub fn get_field_by_row_col(&self, row: usize, col: usize) -> Option<Field> {
        let cell = self.rows.get(row)?.cell(col)?;
        let mut field = self.columns.get_by_offset(col)?.clone();
        field.set_typed_value(cell.clone());
        Some(field)
    }

    pub fn get_field_by_row_name(&self, row: usize, name: &str) -> Option<Field> {
        let col = self.column_offset(name)?;
        self.get_field_by_row_col(row, col)
    }

    /// The row as a record shaped like the schema.
    pub fn row_as_record(&self, index: usize) -> Option<Record> {
        let row = self.rows.get(index)?;
        Some(self.record_from(row))
    }

    /// Every row as a record, in table order.
    pub fn records(&self) -> Vec<Record> {
        self.rows.iter().map(|row| self.record_from(row)).collect()
    }

    fn record_from(&self, row: &Row) -> Record {
        let mut record = self.columns.clone();
        for (field, cell) in record.iter_mut().zip(row.cells.iter()) {
            field.set_typed_value(cell.clone());
        }
        record
    }

    // ========================================================================
    // Search and sort
    // ========================================================================

    /// Rows whose `column` satisfies `operator` against `value`.
    ///
    /// Range operators take both bounds in `value`, joined with the
    /// column's multi-value delimiter (`"18|65"`). Text comparisons are
    /// case-sensitive. Unsupported operator/type combinations are errors.
    pub fn find(&self, column: &str, operator: Operator, value: &str) -> Result<Vec<&Row>> {
        let matcher = self.matcher_for(column, operator, value, true)?;
        Ok(self.find_matching(&matcher))
    }

    /// Like [`Table::find`], comparing text ignoring case.
    pub fn find_ignore_case(
        &self,
        column: &str,
        operator: Operator,
        value: &str,
    ) -> Result<Vec<&Row>> {
        let matcher = self.matcher_for(column, operator, value, false)?;
        Ok(self.find_matching(&matcher))
    }

    /// Rows matching a prepared matcher. Unknown columns match nothing.
    pub fn find_matching(&self, matcher: &Matcher) -> Vec<&Row> {
        let Some(col) = self.column_offset(matcher.column()) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|row| row.cell(col).is_some_and(|cell| matcher.matches(cell)))
            .collect()
    }

    fn matcher_for(
        &self,
        column: &str,
        operator: Operator,
        value: &str,
        case_sensitive: bool,
    ) -> Result<Matcher> {
        let field = self
            .columns
            .get_by_name(column)
            .ok_or_else(|| ModelError::ColumnNotFound {
                name: column.to_string(),
            })?;
        let operands = if operator.is_unary() {
            Vec::new()
        } else if operator.is_range() {
            TypedValue::expand(value, field.delimiter())
        } else {
            vec![value.to_string()]
        };
        Matcher::new(column, field.field_type(), operator, operands, case_sensitive)
    }

    /// Sorts rows in place by a column, type-aware and stable.
    ///
    /// No-op for fewer than two rows, an unknown column, or an `Undefined`
    /// order.
    pub fn sort_by_column(&mut self, name: &str, order: SortOrder) {
        if self.rows.len() < 2 || !order.is_defined() {
            return;
        }
        let Some(col) = self.column_offset(name) else {
            return;
        };
        let field_type = self.columns.fields()[col].field_type();
        self.rows
            .sort_by(|a, b| compare_cells_in(&a.cells[col], &b.cells[col], field_type, order));
        self.sort_column = Some(name.to_string());
        self.sort_order = order;
    }

    /// Active sort column, if the table has been sorted.
    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Deterministic digest over every row-as-record, in table order.
    pub fn generate_hash(&self, include_features: bool) -> String {
        let mut hasher = ContentHasher::new(include_features);
        for row in &self.rows {
            hasher.write_fields(self.record_from(row).fields());
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        let columns = Record::new("people")
            .with_field(Field::text("name"))
            .with_field(Field::integer("age"))
            .with_field(Field::date("joined"))
            .with_field(Field::text("note"));
        let mut table = Table::new(columns);
        for (name, age, joined) in [
            ("Ada", "36", "2021-03-01"),
            ("alan", "41", "2019-07-15"),
            ("Grace", "85", "2023-11-30"),
        ] {
            let row = table
                .new_row()
                .set("name", name)
                .set("age", age)
                .set("joined", joined)
                .build();
            table.add_row(row).unwrap();
        }
        table
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.value(0).to_string()).collect()
    }

    #[test]
    fn rows_are_schema_width() {
        let table = people();
        assert_eq!(table.row_count(), 3);
        assert!(table.rows().iter().all(|r| r.len() == table.column_count()));
    }

    #[test]
    fn wrong_width_rejected() {
        let mut table = people();
        let err = table
            .add_row(Row::from_cells(vec![TypedValue::from("x")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::RowWidthMismatch { expected: 4, actual: 1 }
        ));
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn columns_track_ever_populated() {
        let table = people();
        assert!(table.columns().get_by_name("name").unwrap().is_assigned());
        assert!(!table.columns().get_by_name("note").unwrap().is_assigned());
    }

    #[test]
    fn uncommitted_rows_are_discarded() {
        let table = people();
        let _staged = table.new_row().set("name", "Nobody").build();
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn builder_by_offset_and_unknown_names() {
        let table = people();
        let row = table
            .new_row()
            .set_at(3, "by offset")
            .set_at(42, "dropped")
            .set("nope", "dropped")
            .build();
        assert_eq!(row.len(), 4);
        assert_eq!(row.value(3), "by offset");
        assert_eq!(row.value(0), "");
    }

    #[test]
    fn schema_frozen_after_first_row() {
        let mut table = people();
        assert!(!table.set_columns(Record::new("other")));
        assert!(!table.add_column(Field::text("extra")));
        assert_eq!(table.column_count(), 4);

        let mut empty = Table::default();
        assert!(empty.set_columns(Record::new("fresh").with_field(Field::text("a"))));
        assert!(empty.add_column(Field::text("b")));
        assert_eq!(empty.column_count(), 2);
    }

    #[test]
    fn add_record_maps_by_name() {
        let mut table = people();
        let record = Record::new("in")
            .with_field(Field::integer("age").with_value("7"))
            .with_field(Field::text("unknown").with_value("dropped"))
            .with_field(Field::text("name").with_value("Kid"));
        table.add_record(&record).unwrap();
        let row = table.row(3).unwrap();
        assert_eq!(row.value(0), "Kid");
        assert_eq!(row.value(1), "7");
        assert_eq!(row.value(2), "");
    }

    #[test]
    fn field_copies_do_not_alias() {
        let table = people();
        let mut field = table.get_field_by_row_col(0, 1).unwrap();
        assert_eq!(field.get_value(), "36");
        assert_eq!(field.name(), "age");
        field.set_value("99");
        assert_eq!(table.row(0).unwrap().value(1), "36");
        assert!(table.get_field_by_row_col(9, 0).is_none());
        assert_eq!(table.get_field_by_row_name(2, "name").unwrap().get_value(), "Grace");
    }

    #[test]
    fn live_row_updates() {
        let mut table = people();
        table.row_mut(0).unwrap().set_value(3, "updated");
        assert_eq!(table.row(0).unwrap().value(3), "updated");
        assert!(table.remove_row(0).is_some());
        assert!(table.remove_row(10).is_none());
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn find_text_and_numbers() {
        let table = people();
        assert_eq!(names(&table.find("name", Operator::StartsWith, "A").unwrap()), vec!["Ada"]);
        assert_eq!(
            names(&table.find_ignore_case("name", Operator::StartsWith, "A").unwrap()),
            vec!["Ada", "alan"]
        );
        assert_eq!(
            names(&table.find("age", Operator::GreaterThanEqual, "41").unwrap()),
            vec!["alan", "Grace"]
        );
        assert_eq!(
            names(&table.find("age", Operator::BetweenInclusive, "36|41").unwrap()),
            vec!["Ada", "alan"]
        );
        assert_eq!(
            names(&table.find("age", Operator::Between, "36|41").unwrap()),
            Vec::<String>::new()
        );
        assert_eq!(table.find("note", Operator::Empty, "").unwrap().len(), 3);
    }

    #[test]
    fn find_dates() {
        let table = people();
        let rows = table.find("joined", Operator::LessThan, "2021-01-01").unwrap();
        assert_eq!(names(&rows), vec!["alan"]);
    }

    #[test]
    fn find_unsupported_is_error() {
        let table = people();
        assert!(matches!(
            table.find("age", Operator::Contains, "3"),
            Err(ModelError::UnsupportedFind { .. })
        ));
        assert!(matches!(
            table.find("missing", Operator::Equal, "3"),
            Err(ModelError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn sort_by_date_reverses() {
        let mut table = people();
        table.sort_by_column("joined", SortOrder::Ascending);
        let ascending: Vec<String> = table.rows().iter().map(|r| r.value(0).to_string()).collect();
        assert_eq!(ascending, vec!["alan", "Ada", "Grace"]);
        assert_eq!(table.sort_column(), Some("joined"));

        table.sort_by_column("joined", SortOrder::Descending);
        let descending: Vec<String> = table.rows().iter().map(|r| r.value(0).to_string()).collect();
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
    }

    #[test]
    fn sort_no_ops() {
        let mut table = people();
        let before = table.rows().to_vec();
        table.sort_by_column("nope", SortOrder::Ascending);
        assert_eq!(table.rows(), before.as_slice());
        table.sort_by_column("age", SortOrder::Undefined);
        assert_eq!(table.rows(), before.as_slice());
        assert_eq!(table.sort_column(), None);
    }

    #[test]
    fn sort_text_ignores_case() {
        let mut table = people();
        table.sort_by_column("name", SortOrder::Ascending);
        let sorted: Vec<String> = table.rows().iter().map(|r| r.value(0).to_string()).collect();
        assert_eq!(sorted, vec!["Ada", "alan", "Grace"]);
    }

    #[test]
    fn records_and_hash() {
        let table = people();
        let records = table.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].value_of("name"), "alan");
        assert_eq!(table.row_as_record(2).unwrap().value_of("age"), "85");

        let copy = table.clone();
        assert_eq!(table.generate_hash(true), copy.generate_hash(true));

        let mut changed = table.clone();
        changed.row_mut(0).unwrap().set_value(1, "37");
        assert_ne!(table.generate_hash(true), changed.generate_hash(true));
    }
}
