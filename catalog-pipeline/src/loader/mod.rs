//! Loader module for the catalog pipeline.
//!
//! Uploads documents to the search index in bounded chunks.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::errors::SyncError;
use catalog_repository::SearchIndexProvider;
use catalog_shared::IndexDocument;

/// Configuration for the index loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum number of documents per bulk request.
    pub batch_size: usize,
    /// Extra attempts per chunk after the first failure. 0 disables retries.
    pub max_retries: u32,
    /// Delay before the first retry (in milliseconds); doubled on each retry.
    pub retry_backoff_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_retries: 2,
            retry_backoff_ms: 200,
        }
    }
}

/// Loader that uploads documents to the search index.
///
/// The loader is responsible for:
/// - Splitting the document set into chunks of at most `batch_size`
/// - Retrying each chunk independently with exponential backoff
/// - Treating per-document rejections as a failed chunk
pub struct IndexLoader {
    client: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
}

impl IndexLoader {
    /// Create a new index loader with the given client.
    pub fn new(client: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            client,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new index loader with custom configuration.
    pub fn with_config(client: Arc<dyn SearchIndexProvider>, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    /// Upload the full document set, chunk by chunk.
    ///
    /// Returns the number of documents uploaded. An empty set succeeds
    /// without contacting the backend. A chunk that exhausts its attempts
    /// aborts the load; earlier chunks stay applied.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn load(&self, documents: &[IndexDocument]) -> Result<usize, SyncError> {
        if documents.is_empty() {
            info!("No documents to upload");
            return Ok(0);
        }

        let batch_size = self.config.batch_size.max(1);
        let chunk_count = documents.len().div_ceil(batch_size);

        for (chunk, batch) in documents.chunks(batch_size).enumerate() {
            self.upload_chunk(chunk, batch).await?;
            debug!(chunk, chunk_count, size = batch.len(), "Chunk uploaded");
        }

        info!(
            count = documents.len(),
            chunks = chunk_count,
            "Uploaded documents to search index"
        );
        Ok(documents.len())
    }

    async fn upload_chunk(&self, chunk: usize, batch: &[IndexDocument]) -> Result<(), SyncError> {
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let (reason, rejected_ids) = match self.client.upload_documents(batch).await {
                Ok(summary) if summary.is_complete() => return Ok(()),
                Ok(summary) => (
                    format!(
                        "{} of {} documents rejected",
                        summary.failures.len(),
                        summary.total
                    ),
                    summary.failures.into_iter().map(|f| f.id).collect(),
                ),
                Err(e) => (e.to_string(), Vec::new()),
            };

            if attempt >= max_attempts {
                error!(chunk, attempt, error = %reason, "Chunk upload failed");
                return Err(SyncError::UploadFailed {
                    chunk,
                    attempts: attempt,
                    reason,
                    rejected_ids,
                });
            }

            warn!(
                chunk,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %reason,
                "Chunk upload failed, retrying"
            );
            tokio::time::sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
        }
    }
}
