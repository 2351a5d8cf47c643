//! Records: ordered, name-addressable collections of fields.
//!
//! Insertion order is the canonical iteration and serialization order.
//! Duplicate names are permitted; lookups by name resolve to the first
//! match.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::features::Features;
use crate::field::Field;
use crate::hash::{type_id_of, ContentHasher};

/// A named, ordered collection of fields (a "bag").
///
/// # Example
///
/// ```
/// use tabula_model::{Field, Record};
///
/// let mut person = Record::new("person");
/// person.add(Field::text("name").required());
/// person.add(Field::integer("age"));
///
/// assert!(!person.is_valid());
/// person.set_value("name", "Ada").unwrap();
/// assert!(person.is_valid());
/// assert_eq!(person.value_of("name"), "Ada");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    name: String,
    title: String,
    type_id: Option<u64>,
    features: Features,
    fields: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            ..Record::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Appends a field and returns the record, for literal construction.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

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

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut Features {
        &mut self.features
    }

    /// Schema fingerprint.
    ///
    /// An explicitly assigned id wins. Otherwise the CRC32 of the record
    /// name, or of the concatenated field names for an unnamed record.
    pub fn type_id(&self) -> u64 {
        if let Some(id) = self.type_id {
            return id;
        }
        if self.name.is_empty() {
            let names: String = self.fields.iter().map(Field::name).collect();
            type_id_of(&names)
        } else {
            type_id_of(&self.name)
        }
    }

    pub fn set_type_id(&mut self, type_id: u64) {
        self.type_id = Some(type_id);
    }

    // ========================================================================
    // Field collection
    // ========================================================================

    /// Appends a field. Duplicate names are not rejected.
    pub fn add(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Field> {
        self.fields.iter_mut()
    }

    pub fn count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(Field::name).collect()
    }

    /// First field named `name` (case-sensitive).
    pub fn get_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// First field whose name matches `name` ignoring ASCII case.
    pub fn get_by_name_ignore_case(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    pub fn get_by_offset(&self, offset: usize) -> Option<&Field> {
        self.fields.get(offset)
    }

    pub fn get_by_offset_mut(&mut self, offset: usize) -> Option<&mut Field> {
        self.fields.get_mut(offset)
    }

    /// Offset of the first field named `name`.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Removes and returns the first field named `name`.
    pub fn remove_by_name(&mut self, name: &str) -> Option<Field> {
        let offset = self.offset_of(name)?;
        Some(self.fields.remove(offset))
    }

    pub fn primary_key_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.is_primary_key()).collect()
    }

    // ========================================================================
    // Values by name
    // ========================================================================

    /// First value of the named field, or `""` if there is no such field.
    pub fn value_of(&self, name: &str) -> &str {
        self.get_by_name(name).map(Field::get_value).unwrap_or("")
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.field_mut_or_err(name)?.set_value(value);
        Ok(())
    }

    pub fn set_values<I, S>(&mut self, name: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_mut_or_err(name)?.set_values(values);
        Ok(())
    }

    fn field_mut_or_err(&mut self, name: &str) -> Result<&mut Field> {
        self.get_by_name_mut(name)
            .ok_or_else(|| ModelError::FieldNotFound {
                name: name.to_string(),
            })
    }

    /// Assigns defaults to every unassigned field that has one.
    pub fn assign_defaults(&mut self) {
        for field in self
            .fields
            .iter_mut()
            .filter(|f| !f.is_assigned() && !f.default_value().is_empty())
        {
            field.assign_from_default();
        }
    }

    /// Clears every field value back to unassigned.
    pub fn reset_values(&mut self) {
        for field in &mut self.fields {
            field.clear_value();
        }
    }

    /// A copy containing only the fields that have been assigned.
    pub fn collapse_unassigned(&self) -> Record {
        Record {
            name: self.name.clone(),
            title: self.title.clone(),
            type_id: self.type_id,
            features: self.features.clone(),
            fields: self
                .fields
                .iter()
                .filter(|f| f.is_assigned())
                .cloned()
                .collect(),
        }
    }

    // ========================================================================
    // Validation and hashing
    // ========================================================================

    /// Validates every field, without short-circuiting.
    ///
    /// Previous messages are cleared first, so after the call each failing
    /// field carries exactly its current message.
    pub fn is_valid(&mut self) -> bool {
        for field in &mut self.fields {
            field.clear_validation_message();
        }
        let mut valid = true;
        for field in &mut self.fields {
            if !field.is_valid() {
                valid = false;
            }
        }
        valid
    }

    /// `(field name, message)` for every field with a validation message.
    pub fn validation_messages(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter_map(|f| f.validation_message().map(|m| (f.name(), m)))
            .collect()
    }

    /// Deterministic content digest over every field, in order.
    pub fn generate_hash(&self, include_features: bool) -> String {
        let mut hasher = ContentHasher::new(include_features);
        hasher.write_fields(&self.fields);
        hasher.finish()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;

    fn person() -> Record {
        Record::new("person")
            .with_field(Field::text("name").required())
            .with_field(Field::integer("age").with_range(Range::integer(0, 150)))
            .with_field(Field::text("nickname"))
    }

    #[test]
    fn lookup_by_name() {
        let record = person();
        assert_eq!(record.get_by_name("age").map(Field::name), Some("age"));
        assert!(record.get_by_name("AGE").is_none());
        assert!(record.get_by_name_ignore_case("AGE").is_some());
        assert_eq!(record.offset_of("nickname"), Some(2));
    }

    #[test]
    fn duplicate_names_resolve_to_first() {
        let mut record = Record::new("dup");
        record.add(Field::text("x").with_value("first"));
        record.add(Field::text("x").with_value("second"));
        assert_eq!(record.count(), 2);
        assert_eq!(record.value_of("x"), "first");
    }

    #[test]
    fn set_value_on_missing_field_errors() {
        let mut record = person();
        let err = record.set_value("missing", "x").unwrap_err();
        assert!(matches!(err, ModelError::FieldNotFound { .. }));
    }

    #[test]
    fn validation_collects_all_messages() {
        let mut record = person();
        record.set_value("age", "200").unwrap();
        assert!(!record.is_valid());
        let messages = record.validation_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].0, "name");
        assert_eq!(messages[1].0, "age");

        record.set_value("name", "Ada").unwrap();
        record.set_value("age", "36").unwrap();
        assert!(record.is_valid());
        assert!(record.validation_messages().is_empty());
    }

    #[test]
    fn unassigned_optional_fields_are_valid() {
        let mut record = Record::new("opt")
            .with_field(Field::integer("a").with_range(Range::integer(1, 5)))
            .with_field(Field::text("b"));
        assert!(record.is_valid());
    }

    #[test]
    fn collapse_keeps_assigned_fields() {
        let mut record = person();
        record.set_value("nickname", "").unwrap();
        let collapsed = record.collapse_unassigned();
        assert_eq!(collapsed.names(), vec!["nickname"]);
        assert_eq!(collapsed.name(), "person");
    }

    #[test]
    fn type_id_sources() {
        let named = person();
        assert_eq!(named.type_id(), type_id_of("person"));

        let mut unnamed = Record::default();
        unnamed.add(Field::text("a"));
        unnamed.add(Field::text("b"));
        assert_eq!(unnamed.type_id(), type_id_of("ab"));

        unnamed.set_type_id(7);
        assert_eq!(unnamed.type_id(), 7);
    }

    #[test]
    fn defaults_and_reset() {
        let mut record = Record::new("r")
            .with_field(Field::text("status").with_default("new"))
            .with_field(Field::text("note"));
        record.assign_defaults();
        assert_eq!(record.value_of("status"), "new");
        assert!(!record.get_by_name("note").unwrap().is_assigned());

        record.reset_values();
        assert!(!record.get_by_name("status").unwrap().is_assigned());
    }

    #[test]
    fn hash_is_order_sensitive() {
        let a = Record::new("r")
            .with_field(Field::text("x").with_value("1"))
            .with_field(Field::text("y").with_value("2"));
        let b = Record::new("r")
            .with_field(Field::text("y").with_value("2"))
            .with_field(Field::text("x").with_value("1"));
        assert_ne!(a.generate_hash(true), b.generate_hash(true));
        assert_eq!(a.generate_hash(true), a.clone().generate_hash(true));
    }

    #[test]
    fn remove_and_primary_keys() {
        let mut record = person();
        record
            .get_by_name_mut("name")
            .unwrap()
            .features_mut()
            .set_primary_key(true);
        assert_eq!(record.primary_key_fields().len(), 1);
        assert!(record.remove_by_name("name").is_some());
        assert!(record.remove_by_name("name").is_none());
        assert_eq!(record.count(), 2);
    }
}
