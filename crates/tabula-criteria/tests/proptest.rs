//! Property-based tests for criteria using proptest.

use proptest::prelude::*;
use tabula_criteria::{Criteria, CriterionEntry, PredicateCompiler, Vendor};
use tabula_model::{Field, Operator, Record, Table};

fn table_of(values: &[i64]) -> Table {
    let schema = Record::new("t").with_field(Field::long("n"));
    let mut table = Table::new(schema);
    for value in values {
        let row = table.new_row().set("n", value.to_string()).build();
        table.add_row(row).unwrap();
    }
    table
}

proptest! {
    /// Integer predicates always compile to the normalized literal.
    #[test]
    fn integer_literal_round_trips(n in any::<i64>()) {
        let entry = CriterionEntry::new(Field::long("n"), Operator::Equal, n);
        let sql = PredicateCompiler::default().compile_predicate(&entry).unwrap();
        prop_assert_eq!(sql, format!(" (n = {})", n));
    }

    /// Compiled text literals never contain an unescaped single quote.
    #[test]
    fn text_literals_are_escaped(value in "[a-z' ]{0,16}") {
        let entry = CriterionEntry::new(Field::text("s"), Operator::Equal, value.as_str());
        let sql = PredicateCompiler::for_vendor(Vendor::Generic)
            .compile_predicate(&entry)
            .unwrap();
        let inner = sql
            .strip_prefix(" (s = '")
            .and_then(|s| s.strip_suffix("')"))
            .unwrap();
        prop_assert_eq!(inner.replace("''", ""), value.replace('\'', ""));
    }

    /// Filtering never grows the table and agrees with a direct count.
    #[test]
    fn filter_agrees_with_direct_count(
        values in prop::collection::vec(any::<i64>(), 0..50),
        lo in -1000i64..1000,
        span in 0i64..1000,
    ) {
        let hi = lo + span;
        let table = table_of(&values);
        let criteria = Criteria::new("c").add(Field::long("n"), Operator::Between, [lo, hi]);
        let rows = criteria.filter(&table).unwrap();
        let expected = values.iter().filter(|v| **v > lo && **v < hi).count();
        prop_assert!(rows.len() <= table.row_count());
        prop_assert_eq!(rows.len(), expected);
    }
}
