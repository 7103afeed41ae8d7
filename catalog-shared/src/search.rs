//! Search request and hit types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query syntax the index backend should apply to the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryParser {
    /// The backend's forgiving "simple" syntax (terms, `+`, `-`, `|`, quotes, `*`).
    #[default]
    Simple,
}

/// A backend-neutral search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free text, passed through unchanged (may be empty).
    pub query: String,
    pub parser: QueryParser,
    /// Ask the backend to return every stored field of each hit.
    pub return_all_fields: bool,
    /// Upper bound on the number of hits.
    pub size: usize,
}

impl SearchQuery {
    /// A simple-parser query returning all fields.
    pub fn simple(query: impl Into<String>, size: usize) -> Self {
        Self {
            query: query.into(),
            parser: QueryParser::Simple,
            return_all_fields: true,
            size,
        }
    }
}

/// A field value as returned to API clients.
///
/// Read-all responses carry single strings; search responses carry the
/// backend's multi-valued arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// All values as a slice-like vector, regardless of shape.
    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(value) => vec![value.as_str()],
            FieldValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// One search result: the hit identifier joined with its returned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub fields: BTreeMap<String, FieldValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_serializes_arrays() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "title".to_string(),
            FieldValue::Many(vec!["B".to_string()]),
        );
        let hit = SearchHit {
            id: "v2".to_string(),
            fields,
        };

        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["fields"]["title"], serde_json::json!(["B"]));
    }

    #[test]
    fn test_field_value_untagged_roundtrip_shapes() {
        let single: FieldValue = serde_json::from_str("\"A\"").unwrap();
        let many: FieldValue = serde_json::from_str("[\"A\",\"B\"]").unwrap();

        assert_eq!(single, FieldValue::Single("A".to_string()));
        assert_eq!(many.values(), vec!["A", "B"]);
    }

    #[test]
    fn test_simple_query_defaults() {
        let query = SearchQuery::simple("", 10);
        assert_eq!(query.parser, QueryParser::Simple);
        assert!(query.return_all_fields);
        assert!(query.query.is_empty());
    }
}
