//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, in-memory, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{RawHit, UploadSummary};
use catalog_shared::{IndexDocument, SearchQuery};

/// Abstracts the underlying search index implementation.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Submit a batch of documents in a single bulk request.
    ///
    /// Documents with an existing id are replaced.
    ///
    /// # Arguments
    ///
    /// * `documents` - The documents to upload (never empty)
    ///
    /// # Returns
    ///
    /// * `Ok(UploadSummary)` - The request was processed; per-document rejections are listed
    /// * `Err(SearchIndexError)` - The request as a whole failed
    async fn upload_documents(
        &self,
        documents: &[IndexDocument],
    ) -> Result<UploadSummary, SearchIndexError>;

    /// Run a search and return hits in the backend's native field shape.
    ///
    /// # Arguments
    ///
    /// * `query` - Query text, parser mode and requested size
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RawHit>)` - Hits ordered by relevance
    /// * `Err(SearchIndexError)` - If the search fails
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, SearchIndexError>;

    /// Ensure the index exists with proper mappings.
    ///
    /// This should be called during application startup.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Check if the search backend is healthy and reachable.
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
