//! Field values: canonical string storage and typed views.
//!
//! A [`TypedValue`] stores one or more canonical strings. Typed accessors
//! parse the first string on demand; nothing else caches a typed copy. The
//! [`Value`] enum is the typed view of a string under a given [`FieldType`].

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::field_type::FieldType;
use crate::format;

/// Default multi-value delimiter.
pub const DEFAULT_DELIMITER: &str = "|";

/// Typed view of a canonical string.
///
/// Produced by [`Value::parse`] or [`TypedValue::value`]. Strings that are
/// empty or do not parse under the requested type become [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Date(NaiveDateTime),
    Time(NaiveDateTime),
    DateTime(NaiveDateTime),
    /// Empty, unparseable, or of undefined type.
    Null,
}

impl Value {
    /// Parses `text` as a value of `field_type`.
    pub fn parse(text: &str, field_type: FieldType) -> Value {
        if text.is_empty() {
            return Value::Null;
        }
        let parsed = match field_type {
            FieldType::Text => Some(Value::Text(text.to_string())),
            FieldType::Integer => format::parse_i32(text).map(Value::Integer),
            FieldType::Long => format::parse_i64(text).map(Value::Long),
            FieldType::Float => format::parse_f32(text).map(Value::Float),
            FieldType::Double => format::parse_f64(text).map(Value::Double),
            FieldType::Boolean => format::parse_bool(text).map(Value::Boolean),
            FieldType::Date => format::parse_date_time(text).map(Value::Date),
            FieldType::Time => format::parse_date_time(text).map(Value::Time),
            FieldType::DateTime => format::parse_date_time(text).map(Value::DateTime),
            FieldType::Undefined => None,
        };
        parsed.unwrap_or(Value::Null)
    }

    /// Returns the field type this value belongs to.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Text(_) => FieldType::Text,
            Value::Integer(_) => FieldType::Integer,
            Value::Long(_) => FieldType::Long,
            Value::Float(_) => FieldType::Float,
            Value::Double(_) => FieldType::Double,
            Value::Boolean(_) => FieldType::Boolean,
            Value::Date(_) => FieldType::Date,
            Value::Time(_) => FieldType::Time,
            Value::DateTime(_) => FieldType::DateTime,
            Value::Null => FieldType::Undefined,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the numeric value widened to `f64`, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the instant of a temporal value.
    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(dt) | Value::Time(dt) | Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Compares two values of compatible types.
    ///
    /// Integral values compare exactly; mixed numerics compare as `f64`.
    /// `Null` sorts after everything else. Returns `None` on a type mismatch
    /// or a NaN.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) => Some(Ordering::Greater),
            (_, Value::Null) => Some(Ordering::Less),

            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Long(b)) => Some(i64::from(*a).cmp(b)),
            (Value::Long(a), Value::Integer(b)) => Some(a.cmp(&i64::from(*b))),

            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => match (a.as_date_time(), b.as_date_time()) {
                    (Some(x), Some(y)) => Some(x.cmp(&y)),
                    _ => None,
                },
            },
        }
    }
}

/// Formats the value in its canonical string form. `Null` is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{}", format::format_bool(*b)),
            Value::Date(dt) => write!(f, "{}", format::format_temporal(dt, FieldType::Date)),
            Value::Time(dt) => write!(f, "{}", format::format_temporal(dt, FieldType::Time)),
            Value::DateTime(dt) => {
                write!(f, "{}", format::format_temporal(dt, FieldType::DateTime))
            }
            Value::Null => Ok(()),
        }
    }
}

/// One logical field value stored as canonical strings.
///
/// Single-value instances always hold exactly one string (initially empty).
/// Multi-value instances hold zero or more. The `assigned` flag tells a
/// value that was never set apart from one that was set to empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedValue {
    values: Vec<String>,
    multi_value: bool,
    assigned: bool,
    default_value: String,
}

impl Default for TypedValue {
    fn default() -> Self {
        TypedValue {
            values: vec![String::new()],
            multi_value: false,
            assigned: false,
            default_value: String::new(),
        }
    }
}

impl TypedValue {
    /// Creates an unassigned single-value instance.
    pub fn new() -> Self {
        TypedValue::default()
    }

    /// Creates an unassigned multi-value instance with no values.
    pub fn new_multi() -> Self {
        TypedValue {
            values: Vec::new(),
            multi_value: true,
            ..TypedValue::default()
        }
    }

    /// Replaces all values with a single entry.
    ///
    /// The multi-value flag is left as is.
    pub fn set(&mut self, value: impl Into<String>) {
        self.values.clear();
        self.values.push(value.into());
        self.assigned = true;
    }

    /// Replaces all values and marks this instance multi-value.
    pub fn set_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self.multi_value = true;
        self.assigned = true;
    }

    /// Appends a value, switching to multi-value.
    ///
    /// A lone empty placeholder is replaced rather than kept.
    pub fn add(&mut self, value: impl Into<String>) {
        if !self.multi_value && self.values.len() == 1 && self.values[0].is_empty() {
            self.values.clear();
        }
        self.values.push(value.into());
        self.multi_value = true;
        self.assigned = true;
    }

    /// Returns the value at `offset`, or `""` when out of range.
    pub fn get(&self, offset: usize) -> &str {
        self.values.get(offset).map(String::as_str).unwrap_or("")
    }

    /// Returns the first value, or `""`.
    pub fn first(&self) -> &str {
        self.get(0)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn is_multi_value(&self) -> bool {
        self.multi_value
    }

    pub fn set_multi_value(&mut self, multi_value: bool) {
        self.multi_value = multi_value;
        if !multi_value && self.values.is_empty() {
            self.values.push(String::new());
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Marks the value as set without changing it.
    pub fn mark_assigned(&mut self) {
        self.assigned = true;
    }

    /// Returns `true` if there is no value or every value is empty.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    /// Resets to the unassigned state, keeping the default and the
    /// multi-value flag.
    pub fn clear(&mut self) {
        self.values.clear();
        if !self.multi_value {
            self.values.push(String::new());
        }
        self.assigned = false;
    }

    /// Joins all values with `delimiter`.
    pub fn collapse(&self, delimiter: &str) -> String {
        self.values.join(delimiter)
    }

    /// Splits `text` on `delimiter`.
    ///
    /// Empty input yields no values. An empty delimiter yields `text` as the
    /// single value.
    pub fn expand(text: &str, delimiter: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if delimiter.is_empty() {
            return vec![text.to_string()];
        }
        text.split(delimiter).map(String::from).collect()
    }

    /// Replaces all values with the expansion of `text`.
    pub fn set_collapsed(&mut self, text: &str, delimiter: &str) {
        self.set_values(TypedValue::expand(text, delimiter));
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn set_default_value(&mut self, value: impl Into<String>) {
        self.default_value = value.into();
    }

    /// Copies the default into the live value.
    ///
    /// The `today` literal resolves to the current date.
    pub fn assign_from_default(&mut self) {
        self.assign_from_default_as(FieldType::Date);
    }

    /// Copies the default into the live value, resolving `today` in the
    /// canonical form of `field_type`.
    pub fn assign_from_default_as(&mut self, field_type: FieldType) {
        let value = if format::is_today_literal(&self.default_value) {
            format::resolve_today(field_type)
        } else {
            self.default_value.clone()
        };
        self.set(value);
    }

    // ========================================================================
    // Typed views
    // ========================================================================

    /// Typed view of the first value.
    pub fn value(&self, field_type: FieldType) -> Value {
        Value::parse(self.first(), field_type)
    }

    /// Typed views of all values.
    pub fn typed_values(&self, field_type: FieldType) -> Vec<Value> {
        self.values
            .iter()
            .map(|v| Value::parse(v, field_type))
            .collect()
    }

    pub fn try_int(&self) -> Option<i32> {
        format::parse_i32(self.first())
    }

    pub fn try_long(&self) -> Option<i64> {
        format::parse_i64(self.first())
    }

    pub fn try_float(&self) -> Option<f32> {
        format::parse_f32(self.first())
    }

    pub fn try_double(&self) -> Option<f64> {
        format::parse_f64(self.first())
    }

    pub fn try_bool(&self) -> Option<bool> {
        format::parse_bool(self.first())
    }

    pub fn try_date_time(&self) -> Option<NaiveDateTime> {
        format::parse_date_time(self.first())
    }

    /// First value as `i32`, or `i32::MIN` if it does not parse.
    pub fn as_int(&self) -> i32 {
        self.try_int().unwrap_or(i32::MIN)
    }

    /// First value as `i64`, or `i64::MIN` if it does not parse.
    pub fn as_long(&self) -> i64 {
        self.try_long().unwrap_or(i64::MIN)
    }

    /// First value as `f32`, or `f32::MIN` if it does not parse.
    pub fn as_float(&self) -> f32 {
        self.try_float().unwrap_or(f32::MIN)
    }

    /// First value as `f64`, or `f64::MIN` if it does not parse.
    pub fn as_double(&self) -> f64 {
        self.try_double().unwrap_or(f64::MIN)
    }

    /// First value as `bool`, or `false` if it does not parse.
    pub fn as_bool(&self) -> bool {
        self.try_bool().unwrap_or(false)
    }

    /// First value as an instant, or `NaiveDateTime::MIN` if it does not
    /// parse.
    pub fn as_date_time(&self) -> NaiveDateTime {
        self.try_date_time().unwrap_or(NaiveDateTime::MIN)
    }

    pub fn set_int(&mut self, value: i32) {
        self.set(value.to_string());
    }

    pub fn set_long(&mut self, value: i64) {
        self.set(value.to_string());
    }

    pub fn set_float(&mut self, value: f32) {
        self.set(value.to_string());
    }

    pub fn set_double(&mut self, value: f64) {
        self.set(value.to_string());
    }

    pub fn set_bool(&mut self, value: bool) {
        self.set(format::format_bool(value));
    }

    /// Sets an instant formatted for `field_type`.
    pub fn set_date_time(&mut self, value: &NaiveDateTime, field_type: FieldType) {
        self.set(format::format_temporal(value, field_type));
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        let mut tv = TypedValue::new();
        tv.set(value);
        tv
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        let mut tv = TypedValue::new();
        tv.set(value);
        tv
    }
}

impl From<Vec<String>> for TypedValue {
    fn from(values: Vec<String>) -> Self {
        let mut tv = TypedValue::new_multi();
        tv.set_values(values);
        tv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn new_value_is_unassigned_and_empty() {
        let tv = TypedValue::new();
        assert!(!tv.is_assigned());
        assert!(tv.is_empty());
        assert_eq!(tv.count(), 1);
        assert_eq!(tv.get(0), "");
    }

    #[test]
    fn set_to_empty_is_assigned() {
        let mut tv = TypedValue::new();
        tv.set("");
        assert!(tv.is_assigned());
        assert!(tv.is_empty());
    }

    #[test]
    fn set_keeps_multi_flag() {
        let mut tv = TypedValue::new_multi();
        tv.set("one");
        assert!(tv.is_multi_value());
        assert_eq!(tv.values(), ["one"]);

        let mut single = TypedValue::new();
        single.set("x");
        assert!(!single.is_multi_value());
    }

    #[test]
    fn set_values_forces_multi() {
        let mut tv = TypedValue::new();
        tv.set_values(["a", "b"]);
        assert!(tv.is_multi_value());
        assert!(tv.is_assigned());
        assert_eq!(tv.count(), 2);
        assert_eq!(tv.get(1), "b");
        assert_eq!(tv.get(5), "");
    }

    #[test]
    fn add_replaces_placeholder() {
        let mut tv = TypedValue::new();
        tv.add("a");
        tv.add("b");
        assert_eq!(tv.values(), ["a", "b"]);
        assert!(tv.is_multi_value());
    }

    #[test]
    fn collapse_and_expand() {
        let mut tv = TypedValue::new();
        tv.set_values(["red", "green", "blue"]);
        let text = tv.collapse(DEFAULT_DELIMITER);
        assert_eq!(text, "red|green|blue");
        assert_eq!(TypedValue::expand(&text, DEFAULT_DELIMITER), tv.values());
    }

    #[test]
    fn expand_empty_is_empty_sequence() {
        assert!(TypedValue::expand("", "|").is_empty());
        assert_eq!(TypedValue::expand("a|b", ""), vec!["a|b".to_string()]);
    }

    #[test]
    fn clear_resets_assignment() {
        let mut tv = TypedValue::new();
        tv.set("x");
        tv.clear();
        assert!(!tv.is_assigned());
        assert_eq!(tv.count(), 1);

        let mut multi = TypedValue::new_multi();
        multi.set_values(["a"]);
        multi.clear();
        assert_eq!(multi.count(), 0);
    }

    #[test]
    fn typed_accessors_and_sentinels() {
        let mut tv = TypedValue::new();
        tv.set_int(42);
        assert_eq!(tv.as_int(), 42);
        assert_eq!(tv.as_long(), 42);
        assert_eq!(tv.as_double(), 42.0);

        tv.set("forty-two");
        assert_eq!(tv.as_int(), i32::MIN);
        assert_eq!(tv.as_long(), i64::MIN);
        assert_eq!(tv.as_float(), f32::MIN);
        assert_eq!(tv.as_double(), f64::MIN);
        assert!(!tv.as_bool());
        assert_eq!(tv.as_date_time(), NaiveDateTime::MIN);
        assert_eq!(tv.try_int(), None);
    }

    #[test]
    fn bool_round_trip() {
        let mut tv = TypedValue::new();
        tv.set_bool(true);
        assert_eq!(tv.first(), "true");
        assert!(tv.as_bool());
    }

    #[test]
    fn date_setter_formats_per_type() {
        let instant = NaiveDate::from_ymd_opt(2023, 12, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let mut tv = TypedValue::new();
        tv.set_date_time(&instant, FieldType::Date);
        assert_eq!(tv.first(), "2023-12-01");
        tv.set_date_time(&instant, FieldType::DateTime);
        assert_eq!(tv.first(), "2023-12-01T08:30:00");
        assert_eq!(tv.as_date_time(), instant);
    }

    #[test]
    fn default_assignment() {
        let mut tv = TypedValue::new();
        tv.set_default_value("pending");
        tv.assign_from_default();
        assert_eq!(tv.first(), "pending");
        assert!(tv.is_assigned());

        tv.set_default_value("today");
        tv.assign_from_default();
        assert_ne!(tv.first(), "today");
        assert!(tv.try_date_time().is_some());
    }

    #[test]
    fn typed_view_round_trips_through_display() {
        let mut tv = TypedValue::new();
        tv.set("2024-02-29");
        let view = tv.value(FieldType::Date);
        assert_eq!(view.to_string(), "2024-02-29");

        tv.set("17");
        assert_eq!(tv.value(FieldType::Integer), Value::Integer(17));
        assert_eq!(tv.value(FieldType::Undefined), Value::Null);
    }

    #[test]
    fn value_compare() {
        assert_eq!(
            Value::Integer(3).compare(&Value::Long(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Double(2.5).compare(&Value::Integer(2)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::Null.compare(&Value::Text("a".into())),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Text("a".into()).compare(&Value::Integer(1)), None);
        assert_eq!(Value::Double(f64::NAN).compare(&Value::Double(1.0)), None);
    }
}
