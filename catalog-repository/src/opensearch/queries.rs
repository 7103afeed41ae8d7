//! OpenSearch request builders.
//!
//! Translates backend-neutral documents and queries into OpenSearch bulk and
//! search request bodies.

use serde_json::{json, Map, Value};

use catalog_shared::{DocumentOperation, IndexDocument, QueryParser, SearchQuery};

/// Bulk action name for a document operation.
pub fn bulk_action(operation: DocumentOperation) -> &'static str {
    match operation {
        DocumentOperation::Add => "index",
    }
}

/// Build the newline-delimited bulk body: one action line and one source
/// line per document. The index is taken from the request path.
pub fn build_bulk_body(documents: &[IndexDocument]) -> Vec<Value> {
    let mut body = Vec::with_capacity(documents.len() * 2);

    for document in documents {
        let mut action = Map::new();
        action.insert(
            bulk_action(document.operation).to_string(),
            json!({ "_id": document.id }),
        );
        body.push(Value::Object(action));
        body.push(json!(document.fields));
    }

    body
}

/// Build a search request body from a SearchQuery.
///
/// The simple parser maps to `simple_query_string` over all fields with OR
/// semantics. Asking for all fields uses the fields API, which returns every
/// value as an array.
pub fn build_search_query(query: &SearchQuery) -> Value {
    let text_query = match query.parser {
        QueryParser::Simple => json!({
            "simple_query_string": {
                "query": query.query,
                "default_operator": "or"
            }
        }),
    };

    let mut body = json!({
        "query": text_query,
        "_source": false,
        "size": query.size
    });

    if query.return_all_fields {
        body["fields"] = json!(["*"]);
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_bulk_body_pairs_action_and_source() {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), "A".to_string());
        let documents = vec![
            IndexDocument::add("v1", fields.clone()),
            IndexDocument::add("v2", BTreeMap::new()),
        ];

        let body = build_bulk_body(&documents);

        assert_eq!(body.len(), 4);
        assert_eq!(body[0], json!({"index": {"_id": "v1"}}));
        assert_eq!(body[1], json!({"title": "A"}));
        assert_eq!(body[2], json!({"index": {"_id": "v2"}}));
        assert_eq!(body[3], json!({}));
    }

    #[test]
    fn test_search_query_simple_parser() {
        let query = build_search_query(&SearchQuery::simple("cat -dog", 10));

        assert_eq!(query["query"]["simple_query_string"]["query"], "cat -dog");
        assert_eq!(query["query"]["simple_query_string"]["default_operator"], "or");
        assert_eq!(query["fields"], json!(["*"]));
        assert_eq!(query["_source"], json!(false));
        assert_eq!(query["size"], 10);
    }

    #[test]
    fn test_search_query_passes_empty_text() {
        let query = build_search_query(&SearchQuery::simple("", 5));
        assert_eq!(query["query"]["simple_query_string"]["query"], "");
    }

    #[test]
    fn test_search_query_without_fields() {
        let mut search = SearchQuery::simple("cat", 10);
        search.return_all_fields = false;

        let query = build_search_query(&search);
        assert!(query.get("fields").is_none());
    }
}
