//! Request and response types exchanged with the store and index backends.

use catalog_shared::Record;
use serde_json::{Map, Value};

/// One page of a record scan.
///
/// `last_evaluated_key` is `Some` while more records may remain; pass it back
/// as the exclusive start key of the next page.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    /// Records in this page.
    pub items: Vec<Record>,
    /// Key to resume the scan after, or `None` once the table is drained.
    pub last_evaluated_key: Option<String>,
}

impl ScanPage {
    /// A final page holding `items`.
    pub fn last(items: Vec<Record>) -> Self {
        Self {
            items,
            last_evaluated_key: None,
        }
    }
}

/// A document the index backend refused within an otherwise accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Id of the rejected document.
    pub id: String,
    /// Backend-supplied reason.
    pub reason: String,
}

/// Outcome of one bulk upload request.
///
/// Backends that accept part of a batch report the rejected documents in
/// `failures` instead of failing the whole request.
#[derive(Debug, Clone, Default)]
pub struct UploadSummary {
    /// Number of documents submitted.
    pub total: usize,
    /// Number of documents the backend accepted.
    pub accepted: usize,
    /// Per-document rejections.
    pub failures: Vec<DocumentFailure>,
}

impl UploadSummary {
    /// A summary for a fully accepted upload of `total` documents.
    pub fn accepted(total: usize) -> Self {
        Self {
            total,
            accepted: total,
            failures: Vec::new(),
        }
    }

    /// Whether every document was accepted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.accepted == self.total
    }
}

/// A hit as returned by the index backend, before normalization.
///
/// `fields` keeps the backend's native JSON values (usually arrays).
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    /// Hit identifier (the document id).
    pub id: String,
    /// Returned fields in backend-native shape.
    pub fields: Map<String, Value>,
}
