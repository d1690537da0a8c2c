//! Field-keyed validation error set.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Errors collected while validating a form, keyed by field name.
///
/// Keys are unique and iterate in insertion order, which is the field
/// declaration order of the step — the error summary renders
/// deterministically. The first error recorded for a field wins; each
/// field has exactly one authoritative validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field. Ignored if the field already has one.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.entries.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, message)| (name.as_str(), message.as_str()))
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut errors = ValidationErrors::new();
        errors.add("last-name", "This field cannot be blank");
        errors.add("first-name", "This field cannot be blank");
        errors.add("dob", "Enter the date of birth");

        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["last-name", "first-name", "dob"]);
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("postcode", "This field cannot be blank");
        errors.add("postcode", "Please enter a real postcode");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("postcode"), Some("This field cannot be blank"));
    }

    #[test]
    fn empty_set() {
        let errors = ValidationErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.get("anything"), None);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut errors = ValidationErrors::new();
        errors.add("b-field", "second");
        errors.add("a-field", "first");

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"b-field":"second","a-field":"first"}"#);
    }
}
