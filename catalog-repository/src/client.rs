//! Record store client implementation.
//!
//! This module provides the typed adapter over the primary record store.
//! Application code uses it to ingest `[id, title]` pairs and to read back
//! every stored record.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, instrument};

use crate::config::RecordStoreConfig;
use crate::errors::StoreError;
use crate::interfaces::RecordStoreProvider;
use catalog_shared::Record;

/// The adapter application code uses to read and write catalog records.
pub struct RecordStoreClient {
    provider: Arc<dyn RecordStoreProvider>,
    config: RecordStoreConfig,
}

impl RecordStoreClient {
    /// Create a new RecordStoreClient with default configuration.
    pub fn new(provider: Arc<dyn RecordStoreProvider>) -> Self {
        Self {
            provider,
            config: RecordStoreConfig::default(),
        }
    }

    /// Create a new RecordStoreClient with custom configuration.
    pub fn with_config(provider: Arc<dyn RecordStoreProvider>, config: RecordStoreConfig) -> Self {
        Self { provider, config }
    }

    /// Decode a batch of positional `[id, title]` pairs into records.
    ///
    /// The whole batch is rejected if any element is malformed.
    pub fn decode_pairs(pairs: Vec<Vec<String>>) -> Result<Vec<Record>, StoreError> {
        for (index, pair) in pairs.iter().enumerate() {
            if pair.len() != 2 {
                return Err(StoreError::validation(format!(
                    "Item {} must contain exactly 2 elements: [id, title], got {}",
                    index,
                    pair.len()
                )));
            }
            if pair[0].is_empty() {
                return Err(StoreError::validation(format!(
                    "Item {} has an empty id",
                    index
                )));
            }
        }

        Ok(pairs
            .into_iter()
            .filter_map(|pair| {
                let mut values = pair.into_iter();
                match (values.next(), values.next()) {
                    (Some(id), Some(title)) => Some(Record::new(id, title)),
                    _ => None,
                }
            })
            .collect())
    }

    /// Ingest a batch of `[id, title]` pairs.
    /// Input: Vec<Vec<String>> (each element exactly `[id, title]`)
    /// Output: Result<usize, StoreError> (number of records written)
    ///
    /// Validation happens before any write. Writes are not atomic across the
    /// batch: on a store failure, records already written stay committed and
    /// the error reports how many there were.
    pub async fn put(&self, pairs: Vec<Vec<String>>) -> Result<usize, StoreError> {
        let records = Self::decode_pairs(pairs)?;
        self.put_records(records).await
    }

    /// Write already-typed records.
    /// Input: Vec<Record> (ids must be non-empty)
    /// Output: Result<usize, StoreError> (number of records written)
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn put_records(&self, records: Vec<Record>) -> Result<usize, StoreError> {
        if records.iter().any(|record| record.id.is_empty()) {
            return Err(StoreError::validation("All records must have a non-empty id"));
        }

        let total = records.len();
        if total == 0 {
            return Ok(0);
        }

        // After the first failure no new writes start, but writes already in
        // flight are awaited so `written` counts every committed record.
        let failed = AtomicBool::new(false);
        let provider = &self.provider;
        let mut writes = stream::iter(records.iter())
            .take_while(|_| future::ready(!failed.load(Ordering::SeqCst)))
            .map(move |record| async move { provider.put_item(record).await.map(|()| record) })
            .buffer_unordered(self.config.write_concurrency.max(1))
            .boxed();

        let mut written = 0usize;
        let mut first_error: Option<StoreError> = None;
        while let Some(outcome) = writes.next().await {
            match outcome {
                Ok(record) => {
                    written += 1;
                    debug!(id = %record.id, "Record written");
                }
                Err(e) => {
                    failed.store(true, Ordering::SeqCst);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            None => {
                info!(count = written, "Records written");
                Ok(written)
            }
            Some(e) => {
                error!(written, total, error = %e, "Batch write failed part way");
                Err(StoreError::PartialWrite {
                    written,
                    total,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Read every record in the store.
    /// Output: Result<Vec<Record>, StoreError> (store-native order)
    ///
    /// Drains all pages before returning.
    #[instrument(skip(self))]
    pub async fn scan_all(&self) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::new();
        let mut start_key: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .provider
                .scan_page(start_key.as_deref(), self.config.scan_page_size)
                .await?;
            pages += 1;
            records.extend(page.items);

            match page.last_evaluated_key {
                Some(key) if start_key.as_deref() == Some(key.as_str()) => {
                    return Err(StoreError::scan(format!(
                        "Scan did not advance past key {}",
                        key
                    )));
                }
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        debug!(pages, count = records.len(), "Scan complete");
        Ok(records)
    }
}
