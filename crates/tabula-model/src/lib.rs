//! Tabula Model - Dynamically typed fields, records and tables.
//!
//! Values are stored as canonical strings and interpreted on demand through
//! the field's [`FieldType`]. On top of that storage the crate provides:
//!
//! - [`Field`]: name, type, metadata, optional [`Range`], and one or more values
//! - [`Record`]: an ordered, name-addressable bag of fields
//! - [`Table`]: a column schema plus width-checked [`Row`]s, with search and sort
//! - Validation that records messages on fields instead of failing hard
//! - Deterministic content hashing over records and tables
//!
//! # Quick Start
//!
//! ```rust
//! use tabula_model::{Field, Range, Record};
//!
//! let mut order = Record::new("order")
//!     .with_field(Field::text("customer").required())
//!     .with_field(Field::integer("quantity").with_range(Range::integer(0, 100)))
//!     .with_field(Field::text("tags").multi_value());
//!
//! order.set_value("customer", "ACME").unwrap();
//! order.set_value("quantity", "250").unwrap();
//! order.set_values("tags", ["rush", "export"]).unwrap();
//!
//! assert!(!order.is_valid());
//! assert_eq!(order.validation_messages()[0].0, "quantity");
//! assert_eq!(order.get_by_name("tags").unwrap().collapse(), "rush|export");
//! ```
//!
//! # Parsing Semantics
//!
//! Typed reads never fail. A value that does not parse under the requested
//! type yields a sentinel (`i32::MIN`, `f64::MIN`, `false`, the minimum
//! timestamp). Use the `try_*` accessors on [`TypedValue`] to tell a
//! sentinel apart from a real value.
//!
//! | Type | Canonical form |
//! |------|----------------|
//! | Date | `%Y-%m-%d` |
//! | Time | `%H:%M:%S` |
//! | DateTime | `%Y-%m-%dT%H:%M:%S` |
//! | Boolean | `true` / `false` |

mod error;
mod features;
mod field;
mod field_type;
pub mod format;
pub mod hash;
mod matcher;
mod operator;
pub mod ordering;
mod range;
mod record;
mod table;
mod value;

// Re-export public API
pub use error::{ModelError, Result};
pub use features::{
    Features, FEATURE_IS_HIDDEN, FEATURE_IS_INDEXED, FEATURE_IS_PRIMARY, FEATURE_IS_REQUIRED,
    FEATURE_IS_VISIBLE, FEATURE_MV_DELIMITER, FEATURE_VALIDATION_MESSAGE,
};
pub use field::Field;
pub use field_type::{FieldType, SortOrder};
pub use hash::ContentHasher;
pub use matcher::Matcher;
pub use operator::Operator;
pub use range::Range;
pub use record::Record;
pub use table::{Row, RowBuilder, Table};
pub use value::{TypedValue, Value, DEFAULT_DELIMITER};
