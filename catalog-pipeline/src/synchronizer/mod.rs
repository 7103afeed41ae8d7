//! Synchronizer module for the catalog pipeline.
//!
//! Coordinates a full rebuild: scan the record store, transform every record,
//! upload the documents.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::errors::SyncError;
use crate::loader::IndexLoader;
use crate::processor::DocumentProcessor;
use catalog_repository::RecordStoreClient;
use catalog_shared::IndexDocument;

/// Configuration for the synchronizer.
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Deadline for one reindex run. `None` runs without a deadline.
    pub timeout: Option<Duration>,
    /// Serialize concurrent reindex runs.
    pub exclusive: bool,
}

/// Rebuilds the search index from the record store.
///
/// Every run uploads a full snapshot keyed by id, so re-running after a
/// failure is safe. Documents for records no longer in the store are not
/// removed from the index.
pub struct IndexSynchronizer {
    records: Arc<RecordStoreClient>,
    processor: DocumentProcessor,
    loader: IndexLoader,
    config: SyncConfig,
    run_lock: Mutex<()>,
}

impl IndexSynchronizer {
    /// Create a new synchronizer with the given components.
    pub fn new(records: Arc<RecordStoreClient>, loader: IndexLoader) -> Self {
        Self::with_config(records, loader, SyncConfig::default())
    }

    /// Create a new synchronizer with custom configuration.
    pub fn with_config(
        records: Arc<RecordStoreClient>,
        loader: IndexLoader,
        config: SyncConfig,
    ) -> Self {
        Self {
            records,
            processor: DocumentProcessor::new(),
            loader,
            config,
            run_lock: Mutex::new(()),
        }
    }

    /// Rebuild the index and return the uploaded documents.
    #[instrument(skip(self))]
    pub async fn reindex(&self) -> Result<Vec<IndexDocument>, SyncError> {
        let _guard = if self.config.exclusive {
            Some(self.run_lock.lock().await)
        } else {
            None
        };

        match self.config.timeout {
            Some(deadline) => tokio::time::timeout(deadline, self.run())
                .await
                .map_err(|_| {
                    error!(deadline_ms = deadline.as_millis() as u64, "Reindex timed out");
                    SyncError::TimedOut(deadline)
                })?,
            None => self.run().await,
        }
    }

    async fn run(&self) -> Result<Vec<IndexDocument>, SyncError> {
        info!("Starting reindex");

        let records = self.records.scan_all().await.map_err(|e| {
            error!(error = %e, "Record scan failed");
            SyncError::from(e)
        })?;

        let documents = self.processor.process_batch(&records);
        self.loader.load(&documents).await?;

        info!(count = documents.len(), "Reindex complete");
        Ok(documents)
    }
}
