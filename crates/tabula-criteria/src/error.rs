//! Error types for criteria compilation.

use tabula_model::{FieldType, ModelError, Operator};
use thiserror::Error;

/// Errors raised while building or compiling criteria.
#[derive(Debug, Error)]
pub enum CriteriaError {
    /// A name the compiler needs (field, record) is empty.
    #[error("{what} name is required")]
    MissingName { what: &'static str },

    /// The compiler has no translation for this operator on this type.
    #[error("operator '{operator}' is not supported for {field_type} field '{field}'")]
    UnsupportedOperator {
        field: String,
        operator: Operator,
        field_type: FieldType,
    },

    /// `In`/`NotIn` used on a criterion that does not carry several values.
    #[error("operator '{operator}' on '{field}' must be multi-value")]
    NotMultiValue { field: String, operator: Operator },

    /// The operator needs a different number of values.
    #[error("operator '{operator}' on '{field}' needs {expected} values, got {actual}")]
    MissingOperand {
        field: String,
        operator: Operator,
        expected: usize,
        actual: usize,
    },

    /// A value does not parse under the field's type.
    #[error("'{value}' is not a valid {field_type} literal for '{field}'")]
    InvalidLiteral {
        field: String,
        field_type: FieldType,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Compiler configuration could not be parsed.
    #[error("invalid compiler config: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// Result type for criteria operations.
pub type Result<T> = std::result::Result<T, CriteriaError>;
