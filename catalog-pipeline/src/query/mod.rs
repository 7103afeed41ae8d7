//! Query module for the catalog pipeline.
//!
//! Translates free-text queries into index requests and normalizes the hits.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::errors::QueryError;
use catalog_repository::{RawHit, SearchIndexProvider};
use catalog_shared::{FieldValue, SearchHit, SearchQuery, ID_FIELD};

/// Default number of hits requested from the backend.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Answers free-text searches straight from the index.
pub struct QueryTranslator {
    client: Arc<dyn SearchIndexProvider>,
    max_results: usize,
}

impl QueryTranslator {
    /// Create a new query translator with the default result size.
    pub fn new(client: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            client,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set the number of hits requested per search (at least 1).
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Run a simple-parser search returning every stored field.
    ///
    /// The query text is passed through untouched, including the empty
    /// string. Backend failures are surfaced, never replaced by an empty list.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, QueryError> {
        let request = SearchQuery::simple(query, self.max_results);

        let hits = self.client.search(&request).await.map_err(|e| {
            error!(error = %e, "Search backend failed");
            QueryError::from(e)
        })?;

        debug!(count = hits.len(), "Search returned hits");
        Ok(hits.into_iter().map(normalize_hit).collect())
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Convert one backend-native field value, keeping its shape.
fn normalize_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(FieldValue::Many(
            items.into_iter().map(value_to_string).collect(),
        )),
        other => Some(FieldValue::Single(value_to_string(other))),
    }
}

/// Join a hit's identifier with its returned fields.
pub fn normalize_hit(hit: RawHit) -> SearchHit {
    let fields: BTreeMap<String, FieldValue> = hit
        .fields
        .into_iter()
        .filter(|(name, _)| name != ID_FIELD)
        .filter_map(|(name, value)| normalize_value(value).map(|value| (name, value)))
        .collect();

    SearchHit { id: hit.id, fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_repository::{SearchIndexError, UploadSummary};
    use catalog_shared::IndexDocument;
    use serde_json::{json, Map};
    use tokio::sync::Mutex;

    /// Mock search client for testing.
    struct MockSearchClient {
        hits: Vec<RawHit>,
        queries: Mutex<Vec<SearchQuery>>,
        fail: bool,
    }

    impl MockSearchClient {
        fn returning(hits: Vec<RawHit>) -> Self {
            Self {
                hits,
                queries: Mutex::new(Vec::new()),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchClient {
        async fn upload_documents(
            &self,
            documents: &[IndexDocument],
        ) -> Result<UploadSummary, SearchIndexError> {
            Ok(UploadSummary::accepted(documents.len()))
        }

        async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, SearchIndexError> {
            self.queries.lock().await.push(query.clone());
            if self.fail {
                return Err(SearchIndexError::connection("Mock failure"));
            }
            Ok(self.hits.clone())
        }

        async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    fn raw_hit(id: &str, fields: Value) -> RawHit {
        let fields: Map<String, Value> = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        RawHit {
            id: id.to_string(),
            fields,
        }
    }

    #[tokio::test]
    async fn test_search_maps_hits() {
        let client = Arc::new(MockSearchClient::returning(vec![raw_hit(
            "v2",
            json!({"title": ["B"]}),
        )]));
        let translator = QueryTranslator::new(client.clone());

        let hits = translator.search("B").await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "v2");
        assert_eq!(
            hits[0].fields["title"],
            FieldValue::Many(vec!["B".to_string()])
        );
    }

    #[tokio::test]
    async fn test_search_uses_simple_parser_and_all_fields() {
        let client = Arc::new(MockSearchClient::returning(vec![]));
        let translator = QueryTranslator::new(client.clone()).with_max_results(25);

        translator.search("cat -dog").await.unwrap();

        let queries = client.queries.lock().await;
        assert_eq!(queries[0], SearchQuery::simple("cat -dog", 25));
    }

    #[tokio::test]
    async fn test_empty_query_passes_through() {
        let client = Arc::new(MockSearchClient::returning(vec![]));
        let translator = QueryTranslator::new(client.clone());

        let hits = translator.search("").await.unwrap();

        assert!(hits.is_empty());
        assert_eq!(client.queries.lock().await[0].query, "");
    }

    #[tokio::test]
    async fn test_backend_failure_is_surfaced() {
        let client = Arc::new(MockSearchClient {
            fail: true,
            ..MockSearchClient::returning(vec![raw_hit("v1", json!({"title": ["A"]}))])
        });
        let translator = QueryTranslator::new(client);

        let result = translator.search("A").await;

        assert!(matches!(result, Err(QueryError::BackendUnavailable(_))));
    }

    #[test]
    fn test_normalize_keeps_native_shapes() {
        let hit = normalize_hit(raw_hit(
            "v1",
            json!({
                "title": ["A", "B"],
                "rating": 4,
                "note": "single",
                "missing": null,
                "id": ["shadow"]
            }),
        ));

        assert_eq!(hit.id, "v1");
        assert_eq!(
            hit.fields["title"],
            FieldValue::Many(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(hit.fields["rating"], FieldValue::Single("4".to_string()));
        assert_eq!(hit.fields["note"], FieldValue::Single("single".to_string()));
        assert!(!hit.fields.contains_key("missing"));
        assert!(!hit.fields.contains_key("id"));
    }
}
