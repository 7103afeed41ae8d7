//! Record store error types.
//!
//! This module defines the errors that can occur while reading or writing the
//! primary record store.

use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Malformed input; nothing was written.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach or open the store.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A single write was rejected by the store.
    #[error("Write error: {0}")]
    WriteError(String),

    /// A batch write failed part way; the first `written` records stay committed.
    #[error("Write failed after {written} of {total} records: {reason}")]
    PartialWrite {
        written: usize,
        total: usize,
        reason: String,
    },

    /// Reading a page of records failed.
    #[error("Scan error: {0}")]
    ScanError(String),

    /// A stored row could not be decoded.
    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

impl StoreError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteError(msg.into())
    }

    /// Create a scan error.
    pub fn scan(msg: impl Into<String>) -> Self {
        Self::ScanError(msg.into())
    }

    /// Create a corrupt record error.
    pub fn corrupt(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller should fix its input rather than retry.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}
