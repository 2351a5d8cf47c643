//! Feature flags attached to fields, records and tables.
//!
//! The well-known flags (required, hidden, visible, primary key, indexed,
//! multi-value delimiter, validation message) are typed. Anything else lands
//! in an open string map. The string-keyed [`Features::get`] and
//! [`Features::set`] accessors cover both so serialization layers can treat
//! all features uniformly by their persisted keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format;
use crate::value::DEFAULT_DELIMITER;

pub const FEATURE_IS_REQUIRED: &str = "isRequired";
pub const FEATURE_IS_HIDDEN: &str = "isHidden";
pub const FEATURE_IS_VISIBLE: &str = "isVisible";
pub const FEATURE_IS_PRIMARY: &str = "isPrimary";
pub const FEATURE_IS_INDEXED: &str = "isIndexed";
pub const FEATURE_MV_DELIMITER: &str = "delimiterChar";
pub const FEATURE_VALIDATION_MESSAGE: &str = "validationMessage";

/// Typed feature flags plus a residual open map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Features {
    required: Option<bool>,
    hidden: Option<bool>,
    visible: Option<bool>,
    primary_key: Option<bool>,
    indexed: Option<bool>,
    delimiter: Option<String>,
    validation_message: Option<String>,
    #[serde(default)]
    extra: BTreeMap<String, String>,
}

impl Features {
    pub fn new() -> Self {
        Features::default()
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn set_required(&mut self, value: bool) {
        self.required = Some(value);
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    pub fn set_hidden(&mut self, value: bool) {
        self.hidden = Some(value);
    }

    /// Visible unless explicitly set to false.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    pub fn set_visible(&mut self, value: bool) {
        self.visible = Some(value);
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key.unwrap_or(false)
    }

    pub fn set_primary_key(&mut self, value: bool) {
        self.primary_key = Some(value);
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed.unwrap_or(false)
    }

    pub fn set_indexed(&mut self, value: bool) {
        self.indexed = Some(value);
    }

    /// Multi-value delimiter, `|` unless overridden.
    pub fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }

    pub fn set_delimiter(&mut self, value: impl Into<String>) {
        self.delimiter = Some(value.into());
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    pub fn set_validation_message(&mut self, message: impl Into<String>) {
        self.validation_message = Some(message.into());
    }

    pub fn clear_validation_message(&mut self) {
        self.validation_message = None;
    }

    /// Returns `true` if `key` is set, typed or not.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the persisted string form of a feature.
    pub fn get(&self, key: &str) -> Option<String> {
        let flag = |v: Option<bool>| v.map(|b| format::format_bool(b).to_string());
        match key {
            FEATURE_IS_REQUIRED => flag(self.required),
            FEATURE_IS_HIDDEN => flag(self.hidden),
            FEATURE_IS_VISIBLE => flag(self.visible),
            FEATURE_IS_PRIMARY => flag(self.primary_key),
            FEATURE_IS_INDEXED => flag(self.indexed),
            FEATURE_MV_DELIMITER => self.delimiter.clone(),
            FEATURE_VALIDATION_MESSAGE => self.validation_message.clone(),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Sets a feature by its persisted key.
    ///
    /// Well-known boolean keys parse the value leniently; values that are not
    /// booleans are stored as `false`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let flag = || Some(format::parse_bool(&value).unwrap_or(false));
        match key.as_str() {
            FEATURE_IS_REQUIRED => self.required = flag(),
            FEATURE_IS_HIDDEN => self.hidden = flag(),
            FEATURE_IS_VISIBLE => self.visible = flag(),
            FEATURE_IS_PRIMARY => self.primary_key = flag(),
            FEATURE_IS_INDEXED => self.indexed = flag(),
            FEATURE_MV_DELIMITER => self.delimiter = Some(value),
            FEATURE_VALIDATION_MESSAGE => self.validation_message = Some(value),
            _ => {
                self.extra.insert(key, value);
            }
        }
    }

    /// Removes a feature by its persisted key.
    pub fn remove(&mut self, key: &str) {
        match key {
            FEATURE_IS_REQUIRED => self.required = None,
            FEATURE_IS_HIDDEN => self.hidden = None,
            FEATURE_IS_VISIBLE => self.visible = None,
            FEATURE_IS_PRIMARY => self.primary_key = None,
            FEATURE_IS_INDEXED => self.indexed = None,
            FEATURE_MV_DELIMITER => self.delimiter = None,
            FEATURE_VALIDATION_MESSAGE => self.validation_message = None,
            _ => {
                self.extra.remove(key);
            }
        }
    }

    /// Returns `true` if the feature parses as boolean true.
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key)
            .and_then(|v| format::parse_bool(&v))
            .unwrap_or(false)
    }

    /// All explicitly set features as `(key, value)` pairs, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = [
            FEATURE_IS_REQUIRED,
            FEATURE_IS_HIDDEN,
            FEATURE_IS_VISIBLE,
            FEATURE_IS_PRIMARY,
            FEATURE_IS_INDEXED,
            FEATURE_MV_DELIMITER,
            FEATURE_VALIDATION_MESSAGE,
        ]
        .iter()
        .filter_map(|key| self.get(key).map(|v| (key.to_string(), v)))
        .chain(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())))
        .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
