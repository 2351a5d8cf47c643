//! Type-aware ordering of cell values.
//!
//! Numeric columns compare numerically, temporal columns by parsed instant,
//! and everything else lexicographically ignoring case. Empty,
//! unparseable and non-finite cells sort last.

use std::cmp::Ordering;

use crate::field_type::{FieldType, SortOrder};
use crate::value::{TypedValue, Value};

/// Compares the first values of two cells under `field_type`.
pub fn compare_cells(a: &TypedValue, b: &TypedValue, field_type: FieldType) -> Ordering {
    if field_type.is_numeric() || field_type.is_temporal() {
        return compare_values(&a.value(field_type), &b.value(field_type));
    }
    compare_text_ignore_case(a.first(), b.first())
}

/// Compares two cells and applies a sort direction.
pub fn compare_cells_in(
    a: &TypedValue,
    b: &TypedValue,
    field_type: FieldType,
    order: SortOrder,
) -> Ordering {
    order.apply(compare_cells(a, b, field_type))
}

/// Case-insensitive lexicographic comparison. Empty strings sort last.
pub fn compare_text_ignore_case(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase)),
    }
}

/// Compares two typed values, treating incomparable pairs as equal.
///
/// NaN and infinite floats compare as `Null`, so they sort last and the
/// ordering stays total over a numeric column.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    sortable(a)
        .compare(sortable(b))
        .unwrap_or(Ordering::Equal)
}

static NULL: Value = Value::Null;

fn sortable(value: &Value) -> &Value {
    match value {
        Value::Float(n) if !n.is_finite() => &NULL,
        Value::Double(n) if !n.is_finite() => &NULL,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> TypedValue {
        TypedValue::from(text)
    }

    #[test]
    fn numeric_not_lexical() {
        assert_eq!(
            compare_cells(&cell("9"), &cell("10"), FieldType::Integer),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(&cell("9"), &cell("10"), FieldType::Text),
            Ordering::Greater
        );
    }

    #[test]
    fn dates_by_instant() {
        assert_eq!(
            compare_cells(&cell("2024-02-01"), &cell("2023-12-31"), FieldType::Date),
            Ordering::Greater
        );
    }

    #[test]
    fn text_ignores_case() {
        assert_eq!(
            compare_cells(&cell("apple"), &cell("Banana"), FieldType::Text),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(&cell("ABC"), &cell("abc"), FieldType::Text),
            Ordering::Equal
        );
    }

    #[test]
    fn empty_and_unparseable_sort_last() {
        assert_eq!(
            compare_cells(&TypedValue::new(), &cell("1"), FieldType::Integer),
            Ordering::Greater
        );
        assert_eq!(
            compare_cells(&cell("n/a"), &cell("1"), FieldType::Double),
            Ordering::Greater
        );
        assert_eq!(compare_text_ignore_case("", "a"), Ordering::Greater);
    }

    #[test]
    fn non_finite_sorts_last() {
        assert_eq!(
            compare_cells(&cell("NaN"), &cell("1.5"), FieldType::Double),
            Ordering::Greater
        );
        assert_eq!(
            compare_cells(&cell("-2"), &cell("NaN"), FieldType::Float),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(&cell("NaN"), &TypedValue::new(), FieldType::Double),
            Ordering::Equal
        );
        assert_eq!(
            compare_cells(&cell("inf"), &cell("1e300"), FieldType::Double),
            Ordering::Greater
        );
    }

    #[test]
    fn direction_applies() {
        assert_eq!(
            compare_cells_in(&cell("1"), &cell("2"), FieldType::Long, SortOrder::Descending),
            Ordering::Greater
        );
    }

    #[test]
    fn incomparable_values_tie() {
        assert_eq!(
            compare_values(&Value::Text("a".into()), &Value::Integer(1)),
            Ordering::Equal
        );
    }
}
