//! Error types for the model crate.

use thiserror::Error;

use crate::field_type::FieldType;
use crate::operator::Operator;

/// Errors raised by record and table operations.
///
/// Soft validation failures (required fields, range violations) are not
/// errors; they are recorded as messages on the offending field.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No field with the given name exists in the record.
    #[error("field '{name}' not found")]
    FieldNotFound { name: String },

    /// No column with the given name exists in the table schema.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    /// A row does not have exactly one cell per column.
    #[error("row has {actual} cells but the table has {expected} columns")]
    RowWidthMismatch { expected: usize, actual: usize },

    /// The operator cannot be evaluated against a column of this type.
    #[error("operator '{operator}' is not supported for {field_type} column '{column}'")]
    UnsupportedFind {
        column: String,
        operator: Operator,
        field_type: FieldType,
    },

    /// The operator needs a different number of comparison values.
    #[error("operator '{operator}' on '{column}' needs {expected} values, got {actual}")]
    MissingOperand {
        column: String,
        operator: Operator,
        expected: usize,
        actual: usize,
    },

    /// A comparison value does not parse under the column's type.
    #[error("'{value}' is not a valid {field_type} value for '{column}'")]
    InvalidOperand {
        column: String,
        field_type: FieldType,
        value: String,
    },

    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A serialized token does not name a known variant.
    #[error("unknown {kind} token '{token}'")]
    UnknownToken { kind: &'static str, token: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
