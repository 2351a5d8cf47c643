//! SQL dialects and their literal forms.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabula_model::ModelError;

/// Database vendor the compiled SQL targets.
///
/// The vendor decides how string literals are escaped, how timestamps are
/// written, and the default spelling of boolean literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Vendor {
    #[default]
    Generic,
    PostgreSql,
    Oracle,
    SqlServer,
    Sqlite,
    H2,
    MySql,
    MariaDb,
}

/// How boolean literals are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanStyle {
    /// `TRUE` / `FALSE`
    Keyword,
    /// `1` / `0`
    Numeric,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Vendor {
    pub const ALL: [Vendor; 8] = [
        Vendor::Generic,
        Vendor::PostgreSql,
        Vendor::Oracle,
        Vendor::SqlServer,
        Vendor::Sqlite,
        Vendor::H2,
        Vendor::MySql,
        Vendor::MariaDb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Generic => "Generic",
            Vendor::PostgreSql => "PostgreSql",
            Vendor::Oracle => "Oracle",
            Vendor::SqlServer => "SqlServer",
            Vendor::Sqlite => "Sqlite",
            Vendor::H2 => "H2",
            Vendor::MySql => "MySql",
            Vendor::MariaDb => "MariaDb",
        }
    }

    /// Returns `true` if string literals escape with backslashes instead of
    /// doubled quotes.
    pub fn uses_backslash_escapes(self) -> bool {
        matches!(self, Vendor::MySql | Vendor::MariaDb)
    }

    /// Escapes `text` for use inside a single-quoted literal.
    pub fn escape(self, text: &str) -> String {
        if self.uses_backslash_escapes() {
            let mut out = String::with_capacity(text.len());
            for ch in text.chars() {
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '\'' => out.push_str("\\'"),
                    _ => out.push(ch),
                }
            }
            out
        } else {
            text.replace('\'', "''")
        }
    }

    /// Escapes and single-quotes `text`.
    pub fn quote(self, text: &str) -> String {
        format!("'{}'", self.escape(text))
    }

    /// Timestamp literal in this vendor's preferred form.
    pub fn timestamp_literal(self, value: &NaiveDateTime) -> String {
        let text = value.format(TIMESTAMP_FORMAT);
        match self {
            Vendor::PostgreSql => format!("TIMESTAMP '{}'", text),
            Vendor::Oracle => format!("TO_TIMESTAMP('{}','YYYY-MM-DD HH24:MI:SS')", text),
            _ => format!("'{}'", text),
        }
    }

    pub fn default_boolean_style(self) -> BooleanStyle {
        match self {
            Vendor::PostgreSql | Vendor::H2 => BooleanStyle::Keyword,
            _ => BooleanStyle::Numeric,
        }
    }
}

impl BooleanStyle {
    pub fn literal(self, value: bool) -> &'static str {
        match (self, value) {
            (BooleanStyle::Keyword, true) => "TRUE",
            (BooleanStyle::Keyword, false) => "FALSE",
            (BooleanStyle::Numeric, true) => "1",
            (BooleanStyle::Numeric, false) => "0",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vendor::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ModelError::UnknownToken {
                kind: "vendor",
                token: s.to_string(),
            })
    }
}
