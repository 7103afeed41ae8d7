//! Search index error types.
//!
//! This module defines the error types that can occur during search index operations.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The bulk upload request failed as a whole.
    #[error("Upload error: {0}")]
    UploadError(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an upload error.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::UploadError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
