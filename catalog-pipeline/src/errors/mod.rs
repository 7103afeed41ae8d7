//! Error types for the catalog pipeline.

use std::time::Duration;

use catalog_repository::{SearchIndexError, StoreError};
use thiserror::Error;

/// Errors that can occur while rebuilding the search index.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// The record store scan failed; nothing was uploaded.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A chunk of documents was not accepted after all attempts.
    /// Chunks before it remain applied to the index.
    #[error("Upload failed for chunk {chunk} after {attempts} attempt(s): {reason}")]
    UploadFailed {
        chunk: usize,
        attempts: u32,
        reason: String,
        rejected_ids: Vec<String>,
    },

    /// The run exceeded its deadline.
    #[error("Reindex timed out after {0:?}")]
    TimedOut(Duration),
}

impl SyncError {
    /// Create a source unavailable error.
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        Self::SourceUnavailable(err.to_string())
    }
}

/// Errors that can occur while answering a search.
#[derive(Error, Debug, Clone)]
pub enum QueryError {
    /// The index backend could not serve the query.
    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl QueryError {
    /// Create a backend unavailable error.
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }
}

impl From<SearchIndexError> for QueryError {
    fn from(err: SearchIndexError) -> Self {
        Self::BackendUnavailable(err.to_string())
    }
}
