//! Search-index document type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Operation a document asks the index to perform.
///
/// Only upserts exist today; stale documents are never removed by a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentOperation {
    /// Insert or replace the document with this id.
    Add,
}

/// A denormalized record ready for upload to the search index.
///
/// Serializes as `{"type": "add", "id": ..., "fields": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(rename = "type")]
    pub operation: DocumentOperation,
    pub id: String,
    pub fields: BTreeMap<String, String>,
}

impl IndexDocument {
    /// Create an `add` document.
    pub fn add(id: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self {
            operation: DocumentOperation::Add,
            id: id.into(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_wire_shape() {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), "A".to_string());
        let doc = IndexDocument::add("v1", fields);

        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "add", "id": "v1", "fields": {"title": "A"}})
        );
    }
}
