//! Document payloads and the builder that only writes present values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// String fields of a stored document.
///
/// There is no null representation: a field is either present with a
/// non-empty value or absent. Backends therefore never write nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    #[must_use]
    pub fn builder() -> FieldsBuilder {
        FieldsBuilder::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for Fields {
    /// Collects decoded fields, dropping blank values.
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .collect(),
        )
    }
}

/// Builds [`Fields`] from required and optional values.
#[derive(Debug, Default)]
pub struct FieldsBuilder {
    fields: BTreeMap<String, String>,
}

impl FieldsBuilder {
    /// Set a field; blank values are skipped like absent ones.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.fields.insert(key.to_string(), value);
        }
        self
    }

    /// Set a field only when a value is present.
    #[must_use]
    pub fn set_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn build(self) -> Fields {
        Fields(self.fields)
    }
}

/// A document read back from a store, with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_skips_absent_and_blank_values() {
        let fields = Fields::builder()
            .set("diaryDate", "2024-03-01")
            .set_opt("diaryText", None)
            .set_opt("diaryImageID", Some("   "))
            .set("empty", "")
            .build();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("diaryDate"), Some("2024-03-01"));
        assert!(!fields.contains_key("diaryText"));
        assert!(!fields.contains_key("diaryImageID"));
    }

    #[test]
    fn builder_keeps_text_verbatim() {
        let fields = Fields::builder()
            .set_opt("diaryText", Some("  two lines\nof text "))
            .build();
        assert_eq!(fields.get("diaryText"), Some("  two lines\nof text "));
    }

    #[test]
    fn collecting_drops_blank_values() {
        let fields: Fields = vec![
            ("userName".to_string(), "Labe".to_string()),
            ("profileImageUrl".to_string(), " ".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(fields.len(), 1);
    }
}
