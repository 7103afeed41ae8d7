//! Record store provider trait definition.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::types::ScanPage;
use catalog_shared::Record;

/// Abstracts the primary key-value store holding catalog records.
///
/// Implementations are injected into `RecordStoreClient`, which adds batch
/// validation and page draining on top of these two primitives.
#[async_trait]
pub trait RecordStoreProvider: Send + Sync {
    /// Write a single record, replacing any record with the same id.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the record was stored
    /// * `Err(StoreError)` - If the store rejected the write
    async fn put_item(&self, record: &Record) -> Result<(), StoreError>;

    /// Read one page of records in store-native order.
    ///
    /// # Arguments
    ///
    /// * `exclusive_start_key` - Resume after this id (`None` starts from the beginning)
    /// * `limit` - Maximum number of records in the page
    ///
    /// # Returns
    ///
    /// * `Ok(ScanPage)` - The page and the key to resume from, if any
    /// * `Err(StoreError)` - If the scan failed
    async fn scan_page(
        &self,
        exclusive_start_key: Option<&str>,
        limit: usize,
    ) -> Result<ScanPage, StoreError>;
}
