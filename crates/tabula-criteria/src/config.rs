//! Compiler configuration.
//!
//! ```yaml
//! vendor: PostgreSql
//! identifier_case: Lower
//! boolean_style: Numeric
//! ```
//!
//! Every key is optional. A missing `boolean_style` follows the vendor.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vendor::{BooleanStyle, Vendor};

/// Case folding applied to column and table identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IdentifierCase {
    #[default]
    AsIs,
    Upper,
    Lower,
}

impl IdentifierCase {
    pub fn apply(self, identifier: &str) -> String {
        match self {
            IdentifierCase::AsIs => identifier.to_string(),
            IdentifierCase::Upper => identifier.to_uppercase(),
            IdentifierCase::Lower => identifier.to_lowercase(),
        }
    }
}

/// Settings for [`PredicateCompiler`](crate::PredicateCompiler).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub vendor: Vendor,
    pub identifier_case: IdentifierCase,
    pub boolean_style: Option<BooleanStyle>,
}

impl CompilerConfig {
    pub fn new(vendor: Vendor) -> Self {
        CompilerConfig {
            vendor,
            ..CompilerConfig::default()
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn with_identifier_case(mut self, case: IdentifierCase) -> Self {
        self.identifier_case = case;
        self
    }

    pub fn with_boolean_style(mut self, style: BooleanStyle) -> Self {
        self.boolean_style = Some(style);
        self
    }

    /// Effective boolean style: the explicit one, else the vendor's.
    pub fn boolean_style(&self) -> BooleanStyle {
        self.boolean_style
            .unwrap_or_else(|| self.vendor.default_boolean_style())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CriteriaError;

    #[test]
    fn defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.vendor, Vendor::Generic);
        assert_eq!(config.identifier_case, IdentifierCase::AsIs);
        assert_eq!(config.boolean_style(), BooleanStyle::Numeric);
    }

    #[test]
    fn parses_yaml() {
        let config = CompilerConfig::from_yaml_str(
            "vendor: PostgreSql\nidentifier_case: Upper\n",
        )
        .unwrap();
        assert_eq!(config.vendor, Vendor::PostgreSql);
        assert_eq!(config.identifier_case, IdentifierCase::Upper);
        assert_eq!(config.boolean_style(), BooleanStyle::Keyword);
    }

    #[test]
    fn explicit_boolean_style_wins() {
        let config = CompilerConfig::from_yaml_str("vendor: H2\nboolean_style: Numeric").unwrap();
        assert_eq!(config.boolean_style(), BooleanStyle::Numeric);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = CompilerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, CompilerConfig::default());
    }

    #[test]
    fn bad_yaml_is_config_error() {
        let err = CompilerConfig::from_yaml_str("vendor: Db2").unwrap_err();
        assert!(matches!(err, CriteriaError::Config(_)));
    }

    #[test]
    fn identifier_case_folding() {
        assert_eq!(IdentifierCase::Upper.apply("created_at"), "CREATED_AT");
        assert_eq!(IdentifierCase::Lower.apply("Name"), "name");
        assert_eq!(IdentifierCase::AsIs.apply("Name"), "Name");
    }
}
