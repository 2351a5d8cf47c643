//! Named, typed fields.
//!
//! A [`Field`] wraps a [`TypedValue`] with schema metadata: name, title,
//! declared type, display size, sort preference, features and an optional
//! validation [`Range`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::features::Features;
use crate::field_type::{FieldType, SortOrder};
use crate::range::Range;
use crate::value::{TypedValue, Value};

/// A named, typed, single- or multi-valued datum.
///
/// Equality compares the name and the collapsed value only; features,
/// title and range are ignored.
///
/// # Example
///
/// ```
/// use tabula_model::{Field, Range};
///
/// let mut age = Field::integer("age").with_title("Age").required();
/// age.set_range(Range::integer(0, 150));
/// age.set_value("42");
/// assert!(age.is_valid());
///
/// age.set_value("200");
/// assert!(!age.is_valid());
/// assert!(age.validation_message().is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    name: String,
    title: String,
    field_type: FieldType,
    display_size: usize,
    sort_order: SortOrder,
    features: Features,
    range: Option<Range>,
    value: TypedValue,
}

impl Field {
    /// Creates an unassigned single-value field.
    pub fn new(field_type: FieldType, name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            title: String::new(),
            field_type,
            display_size: default_display_size(field_type),
            sort_order: SortOrder::Undefined,
            features: Features::new(),
            range: None,
            value: TypedValue::new(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Field::new(FieldType::Text, name)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Field::new(FieldType::Integer, name)
    }

    pub fn long(name: impl Into<String>) -> Self {
        Field::new(FieldType::Long, name)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Field::new(FieldType::Float, name)
    }

    pub fn double(name: impl Into<String>) -> Self {
        Field::new(FieldType::Double, name)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Field::new(FieldType::Boolean, name)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Field::new(FieldType::Date, name)
    }

    pub fn time(name: impl Into<String>) -> Self {
        Field::new(FieldType::Time, name)
    }

    pub fn date_time(name: impl Into<String>) -> Self {
        Field::new(FieldType::DateTime, name)
    }

    // ========================================================================
    // Builder-style setters
    // ========================================================================

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value.set(value);
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value.set_values(values);
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.value.set_default_value(value);
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn with_display_size(mut self, size: usize) -> Self {
        self.display_size = size;
        self
    }

    pub fn with_feature(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.features.set(key, value);
        self
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.features.set_required(true);
        self
    }

    /// Marks the field multi-value without assigning it.
    pub fn multi_value(mut self) -> Self {
        self.value.set_multi_value(true);
        self
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Display label, falling back to the name.
    pub fn title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn set_field_type(&mut self, field_type: FieldType) {
        self.field_type = field_type;
    }

    pub fn display_size(&self) -> usize {
        self.display_size
    }

    pub fn set_display_size(&mut self, size: usize) {
        self.display_size = size;
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut Features {
        &mut self.features
    }

    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    pub fn set_range(&mut self, range: Range) {
        self.range = Some(range);
    }

    pub fn clear_range(&mut self) {
        self.range = None;
    }

    pub fn is_required(&self) -> bool {
        self.features.is_required()
    }

    pub fn is_primary_key(&self) -> bool {
        self.features.is_primary_key()
    }

    /// `false` if the field is hidden or explicitly not visible.
    pub fn is_displayable(&self) -> bool {
        !self.features.is_hidden() && self.features.is_visible()
    }

    /// Multi-value delimiter for this field.
    pub fn delimiter(&self) -> &str {
        self.features.delimiter()
    }

    // ========================================================================
    // Value access
    // ========================================================================

    pub fn typed_value(&self) -> &TypedValue {
        &self.value
    }

    pub fn typed_value_mut(&mut self) -> &mut TypedValue {
        &mut self.value
    }

    /// Replaces the whole value container, e.g. with a table cell.
    pub fn set_typed_value(&mut self, value: TypedValue) {
        self.value = value;
    }

    /// Typed view of the first value under the declared type.
    pub fn value(&self) -> Value {
        self.value.value(self.field_type)
    }

    /// First canonical value, or `""`.
    pub fn get_value(&self) -> &str {
        self.value.first()
    }

    pub fn get_value_at(&self, offset: usize) -> &str {
        self.value.get(offset)
    }

    pub fn get_values(&self) -> &[String] {
        self.value.values()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value.set(value);
    }

    pub fn set_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value.set_values(values);
    }

    pub fn add_value(&mut self, value: impl Into<String>) {
        self.value.add(value);
    }

    pub fn value_count(&self) -> usize {
        self.value.count()
    }

    pub fn is_multi_value(&self) -> bool {
        self.value.is_multi_value()
    }

    pub fn is_assigned(&self) -> bool {
        self.value.is_assigned()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Values joined with this field's delimiter.
    pub fn collapse(&self) -> String {
        self.value.collapse(self.features.delimiter())
    }

    /// Replaces the values with `text` split on this field's delimiter.
    pub fn expand(&mut self, text: &str) {
        let delimiter = self.features.delimiter().to_string();
        self.value.set_collapsed(text, &delimiter);
    }

    pub fn clear_value(&mut self) {
        self.value.clear();
    }

    pub fn default_value(&self) -> &str {
        self.value.default_value()
    }

    pub fn set_default_value(&mut self, value: impl Into<String>) {
        self.value.set_default_value(value);
    }

    /// Copies the default into the value, resolving `today` for this
    /// field's type.
    pub fn assign_from_default(&mut self) {
        self.value.assign_from_default_as(self.field_type);
    }

    pub fn as_int(&self) -> i32 {
        self.value.as_int()
    }

    pub fn as_long(&self) -> i64 {
        self.value.as_long()
    }

    pub fn as_float(&self) -> f32 {
        self.value.as_float()
    }

    pub fn as_double(&self) -> f64 {
        self.value.as_double()
    }

    pub fn as_bool(&self) -> bool {
        self.value.as_bool()
    }

    pub fn as_date_time(&self) -> NaiveDateTime {
        self.value.as_date_time()
    }

    pub fn set_int(&mut self, value: i32) {
        self.value.set_int(value);
    }

    pub fn set_long(&mut self, value: i64) {
        self.value.set_long(value);
    }

    pub fn set_float(&mut self, value: f32) {
        self.value.set_float(value);
    }

    pub fn set_double(&mut self, value: f64) {
        self.value.set_double(value);
    }

    pub fn set_bool(&mut self, value: bool) {
        self.value.set_bool(value);
    }

    /// Sets an instant in the canonical form of this field's type.
    pub fn set_date_time(&mut self, value: &NaiveDateTime) {
        self.value.set_date_time(value, self.field_type);
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validates the field, recording a message on failure.
    ///
    /// A field is invalid when it is required but empty, or when a range is
    /// assigned and any non-empty value falls outside it. Empty optional
    /// fields are always valid.
    pub fn is_valid(&mut self) -> bool {
        self.features.clear_validation_message();

        if self.value.is_empty() {
            if self.is_required() {
                let message = format!("'{}' is required", self.title());
                self.features.set_validation_message(message);
                return false;
            }
            return true;
        }

        if let Some(range) = &self.range {
            let offending = self
                .value
                .values()
                .iter()
                .find(|v| !v.is_empty() && !range.is_valid(v));
            if let Some(value) = offending {
                let message = format!("'{}' value '{}' must be {}", self.title(), value, range);
                self.features.set_validation_message(message);
                return false;
            }
        }

        true
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.features.validation_message()
    }

    pub fn clear_validation_message(&mut self) {
        self.features.clear_validation_message();
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.collapse() == other.collapse()
    }
}

fn default_display_size(field_type: FieldType) -> usize {
    match field_type {
        FieldType::Text | FieldType::Undefined => 30,
        FieldType::Integer => 11,
        FieldType::Long => 20,
        FieldType::Float | FieldType::Double => 15,
        FieldType::Boolean => 5,
        FieldType::Date => 10,
        FieldType::Time => 8,
        FieldType::DateTime => 19,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_IS_VISIBLE;
    use chrono::NaiveDate;

    #[test]
    fn typed_setters_store_canonical_text() {
        let mut field = Field::float("ratio");
        field.set_float(0.25);
        assert_eq!(field.get_value(), "0.25");
        assert_eq!(field.as_float(), 0.25);

        field.set_double(1.5);
        assert_eq!(field.get_value(), "1.5");
    }

    #[test]
    fn title_falls_back_to_name() {
        let field = Field::text("status");
        assert_eq!(field.title(), "status");
        let field = field.with_title("Status");
        assert_eq!(field.title(), "Status");
    }

    #[test]
    fn required_empty_is_invalid() {
        let mut field = Field::text("email").with_title("Email").required();
        assert!(!field.is_valid());
        assert_eq!(field.validation_message(), Some("'Email' is required"));

        field.set_value("a@b.c");
        assert!(field.is_valid());
        assert_eq!(field.validation_message(), None);
    }

    #[test]
    fn optional_unassigned_with_range_is_valid() {
        let mut field = Field::integer("qty").with_range(Range::integer(0, 10));
        assert!(field.is_valid());
    }

    #[test]
    fn range_violation_is_recorded() {
        let mut field = Field::integer("qty").with_range(Range::integer(0, 10));
        field.set_value("10");
        assert!(!field.is_valid());
        assert_eq!(
            field.validation_message(),
            Some("'qty' value '10' must be between 0 and 10")
        );
    }

    #[test]
    fn range_checks_every_value() {
        let mut field = Field::text("color").with_range(Range::text(["red", "blue"]));
        field.set_values(["red", "green"]);
        assert!(!field.is_valid());
        field.set_values(["red", "blue"]);
        assert!(field.is_valid());
    }

    #[test]
    fn displayable() {
        let mut field = Field::text("secret");
        assert!(field.is_displayable());
        field.features_mut().set_hidden(true);
        assert!(!field.is_displayable());

        let field = Field::text("x").with_feature(FEATURE_IS_VISIBLE, "false");
        assert!(!field.is_displayable());
    }

    #[test]
    fn equality_ignores_features() {
        let a = Field::text("name").with_value("Ada").required();
        let b = Field::text("name").with_value("Ada").with_title("Name");
        let c = Field::text("name").with_value("Grace");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn clone_is_deep() {
        let original = Field::text("tags").with_values(["a", "b"]);
        let mut copy = original.clone();
        copy.add_value("c");
        copy.features_mut().set_hidden(true);
        assert_eq!(original.value_count(), 2);
        assert!(original.is_displayable());
    }

    #[test]
    fn collapse_uses_field_delimiter() {
        let mut field = Field::text("tags").with_feature("delimiterChar", ",");
        field.expand("x,y,z");
        assert_eq!(field.get_values(), ["x", "y", "z"]);
        assert_eq!(field.collapse(), "x,y,z");
        assert!(field.is_multi_value());
    }

    #[test]
    fn date_setter_uses_declared_type() {
        let mut field = Field::date("born");
        let instant = NaiveDate::from_ymd_opt(1990, 5, 17)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        field.set_date_time(&instant);
        assert_eq!(field.get_value(), "1990-05-17");
        assert_eq!(field.value(), Value::Date(instant.date().and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn today_default_for_time_field() {
        let mut field = Field::time("at").with_default("TODAY");
        field.assign_from_default();
        assert_eq!(field.get_value().len(), 8);
    }
}
