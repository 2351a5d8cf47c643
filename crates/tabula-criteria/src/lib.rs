//! Tabula Criteria - Filter criteria over records and a SQL predicate compiler.
//!
//! A [`Criteria`] is an ordered list of `(field, operator, value)` entries
//! combined with AND. The same criteria can be:
//!
//! - evaluated in memory against a [`Record`](tabula_model::Record) or the
//!   rows of a [`Table`](tabula_model::Table)
//! - compiled into vendor-specific SQL text by a [`PredicateCompiler`]
//!
//! # Quick Start
//!
//! ```rust
//! use tabula_criteria::{Criteria, PredicateCompiler, Vendor};
//! use tabula_model::{Field, Operator};
//!
//! let criteria = Criteria::new("active adults")
//!     .add(Field::text("status"), Operator::Equal, "active")
//!     .add(Field::integer("age"), Operator::BetweenInclusive, [18i64, 65]);
//!
//! let compiler = PredicateCompiler::for_vendor(Vendor::PostgreSql);
//! assert_eq!(
//!     compiler.compile_where(&criteria).unwrap(),
//!     "WHERE (status = 'active') AND ((age >= 18) AND (age <= 65))"
//! );
//! ```
//!
//! # Configuration
//!
//! [`CompilerConfig`] selects the vendor, identifier case folding, and the
//! boolean literal style, and can be read from YAML:
//!
//! ```rust
//! use tabula_criteria::{CompilerConfig, Vendor};
//!
//! let config = CompilerConfig::from_yaml_str("vendor: Oracle").unwrap();
//! assert_eq!(config.vendor, Vendor::Oracle);
//! ```

mod compiler;
mod config;
mod criteria;
mod error;
mod vendor;

// Re-export public API
pub use compiler::PredicateCompiler;
pub use config::{CompilerConfig, IdentifierCase};
pub use criteria::{Criteria, CriterionEntry, CriterionValue};
pub use error::{CriteriaError, Result};
pub use vendor::{BooleanStyle, Vendor};
