//! Primary-store record type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute name holding the primary key.
pub const ID_FIELD: &str = "id";

/// Attribute name holding the media title.
pub const TITLE_FIELD: &str = "title";

/// A media record as held by the primary key-value store.
///
/// `id` is client-supplied and unique. `fields` is an open set of string
/// attributes; re-writing an `id` replaces all of them (last write wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Primary key.
    pub id: String,
    /// Every attribute other than `id`, as bare strings.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Record {
    /// Create a record with a single `title` attribute.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(TITLE_FIELD.to_string(), title.into());
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Create a record with no attributes besides its id.
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The record's title, if it has one.
    pub fn title(&self) -> Option<&str> {
        self.fields.get(TITLE_FIELD).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_fields_as_strings() {
        let record = Record::new("v1", "A");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "v1");
        assert_eq!(json["fields"]["title"], "A");
        assert!(json["fields"]["title"].is_string());
    }

    #[test]
    fn test_with_field_overwrites() {
        let record = Record::new("v1", "A").with_field("title", "B");
        assert_eq!(record.title(), Some("B"));
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn test_bare_record_has_no_title() {
        let record = Record::bare("v1");
        assert!(record.title().is_none());
        assert!(record.fields.is_empty());
    }
}
