//! # Tabula - Typed records, tables and SQL criteria
//!
//! Tabula models dynamically typed data the way form, import and reporting
//! layers see it: named fields with a declared type, records of fields, and
//! tables of aligned rows. Filters are expressed once as [`Criteria`] and
//! either evaluated in memory or compiled into vendor-specific SQL.
//!
//! This crate re-exports [`tabula_model`] and [`tabula_criteria`]. Most
//! callers only need the [`prelude`].
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let schema = Record::new("orders")
//!     .with_field(Field::text("customer"))
//!     .with_field(Field::double("total").with_sort_order(SortOrder::Descending));
//!
//! let mut orders = Table::new(schema.clone());
//! for (customer, total) in [("acme", "120.0"), ("globex", "75.5"), ("initech", "310")] {
//!     let row = orders.new_row().set("customer", customer).set("total", total).build();
//!     orders.add_row(row)?;
//! }
//!
//! let big = Criteria::new("big").add(Field::double("total"), Operator::GreaterThan, 100.0);
//! assert_eq!(big.filter(&orders)?.len(), 2);
//!
//! let sql = PredicateCompiler::for_vendor(Vendor::Sqlite).compile_select(&schema, Some(&big))?;
//! assert_eq!(
//!     sql,
//!     "SELECT customer, total FROM orders WHERE (total > 100) ORDER BY total DESC"
//! );
//! # Ok::<(), tabula::criteria::CriteriaError>(())
//! ```
//!
//! ## Crates
//!
//! - [`model`]: fields, records, tables, validation and hashing
//! - [`criteria`]: criteria, in-memory evaluation and the SQL compiler

pub use tabula_criteria as criteria;
pub use tabula_model as model;

pub use tabula_criteria::{
    BooleanStyle, CompilerConfig, Criteria, CriteriaError, CriterionEntry, CriterionValue,
    IdentifierCase, PredicateCompiler, Vendor,
};
pub use tabula_model::{
    ContentHasher, Features, Field, FieldType, Matcher, ModelError, Operator, Range, Record, Row,
    RowBuilder, SortOrder, Table, TypedValue, Value,
};

/// Everything needed to build records, tables and criteria.
pub mod prelude {
    pub use tabula_criteria::{
        CompilerConfig, Criteria, CriterionEntry, PredicateCompiler, Vendor,
    };
    pub use tabula_model::{
        Field, FieldType, Operator, Range, Record, Row, SortOrder, Table, TypedValue, Value,
    };
}
