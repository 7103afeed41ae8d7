//! In-memory search index with term matching.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{RawHit, UploadSummary};
use catalog_shared::{DocumentOperation, IndexDocument, SearchQuery};

/// Search index held in process memory.
///
/// Search splits text on non-alphanumeric characters and lowercases it, so
/// simple-syntax operators are ignored and any matching term is enough for a
/// hit (OR semantics). Hits are ranked by matched term count, then by id.
/// Returned fields are single-element arrays, like a multi-valued backend.
pub struct InMemorySearchIndex {
    documents: RwLock<BTreeMap<String, IndexDocument>>,
    uploads: Mutex<Vec<Vec<IndexDocument>>>,
    available: AtomicBool,
}

impl Default for InMemorySearchIndex {
    fn default() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            uploads: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemorySearchIndex {
    /// Create a new, empty and available index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether no documents are indexed.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Every upload request received so far, in arrival order.
    pub async fn upload_history(&self) -> Vec<Vec<IndexDocument>> {
        self.uploads.lock().await.clone()
    }

    /// Simulate the backend going down or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), SearchIndexError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SearchIndexError::connection("In-memory index is unavailable"))
        }
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn to_raw_hit(document: &IndexDocument) -> RawHit {
    let fields: Map<String, Value> = document
        .fields
        .iter()
        .map(|(name, value)| {
            (
                name.clone(),
                Value::Array(vec![Value::String(value.clone())]),
            )
        })
        .collect();

    RawHit {
        id: document.id.clone(),
        fields,
    }
}

#[async_trait]
impl SearchIndexProvider for InMemorySearchIndex {
    async fn upload_documents(
        &self,
        documents: &[IndexDocument],
    ) -> Result<UploadSummary, SearchIndexError> {
        self.ensure_available()?;

        {
            let mut stored = self.documents.write().await;
            for document in documents {
                match document.operation {
                    DocumentOperation::Add => {
                        stored.insert(document.id.clone(), document.clone());
                    }
                }
            }
        }
        self.uploads.lock().await.push(documents.to_vec());

        debug!(count = documents.len(), "Documents uploaded to in-memory index");
        Ok(UploadSummary::accepted(documents.len()))
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, SearchIndexError> {
        self.ensure_available()?;

        let terms: HashSet<String> = tokenize(&query.query).collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let documents = self.documents.read().await;
        let mut scored: Vec<(usize, &IndexDocument)> = documents
            .values()
            .filter_map(|document| {
                let tokens: HashSet<String> = document
                    .fields
                    .values()
                    .flat_map(|value| tokenize(value))
                    .collect();
                let matched = terms.iter().filter(|term| tokens.contains(*term)).count();
                (matched > 0).then_some((matched, document))
            })
            .collect();

        scored.sort_by(|(a_score, a_doc), (b_score, b_doc)| {
            b_score.cmp(a_score).then_with(|| a_doc.id.cmp(&b_doc.id))
        });

        Ok(scored
            .into_iter()
            .take(query.size)
            .map(|(_, document)| to_raw_hit(document))
            .collect())
    }

    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(self.available.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str) -> IndexDocument {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), title.to_string());
        IndexDocument::add(id, fields)
    }

    #[tokio::test]
    async fn test_search_matches_any_term() {
        let index = InMemorySearchIndex::new();
        index
            .upload_documents(&[doc("v1", "Cat Video"), doc("v2", "Dog Video")])
            .await
            .unwrap();

        let hits = index.search(&SearchQuery::simple("cat", 10)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "v1");

        let hits = index
            .search(&SearchQuery::simple("video", 10))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_ranks_by_matched_terms() {
        let index = InMemorySearchIndex::new();
        index
            .upload_documents(&[doc("a", "red"), doc("b", "red car")])
            .await
            .unwrap();

        let hits = index
            .search(&SearchQuery::simple("+red +car", 10))
            .await
            .unwrap();
        assert_eq!(hits[0].id, "b");
        assert_eq!(hits[1].id, "a");
    }

    #[tokio::test]
    async fn test_hit_fields_are_arrays() {
        let index = InMemorySearchIndex::new();
        index.upload_documents(&[doc("v1", "A")]).await.unwrap();

        let hits = index.search(&SearchQuery::simple("a", 10)).await.unwrap();
        assert_eq!(hits[0].fields["title"], serde_json::json!(["A"]));
    }

    #[tokio::test]
    async fn test_empty_query_returns_nothing() {
        let index = InMemorySearchIndex::new();
        index.upload_documents(&[doc("v1", "A")]).await.unwrap();

        let hits = index.search(&SearchQuery::simple("", 10)).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_upload_upserts_by_id() {
        let index = InMemorySearchIndex::new();
        index.upload_documents(&[doc("v1", "Old")]).await.unwrap();
        index.upload_documents(&[doc("v1", "New")]).await.unwrap();

        assert_eq!(index.len().await, 1);
        assert_eq!(index.upload_history().await.len(), 2);
        let hits = index.search(&SearchQuery::simple("new", 10)).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_index_fails() {
        let index = InMemorySearchIndex::new();
        index.set_available(false);

        assert!(index.upload_documents(&[doc("v1", "A")]).await.is_err());
        assert!(index.search(&SearchQuery::simple("a", 10)).await.is_err());
        assert!(!index.health_check().await.unwrap());
    }
}
