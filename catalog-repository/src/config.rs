//! Configuration types for the RecordStoreClient.

/// Configuration for the RecordStoreClient.
#[derive(Debug, Clone)]
pub struct RecordStoreConfig {
    /// Number of records requested per scan page.
    pub scan_page_size: usize,
    /// Number of record writes allowed in flight during a batch put.
    /// 1 writes records strictly in input order.
    pub write_concurrency: usize,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            scan_page_size: 100,
            write_concurrency: 1,
        }
    }
}

impl RecordStoreConfig {
    /// Create a config with a custom scan page size.
    pub fn with_scan_page_size(mut self, scan_page_size: usize) -> Self {
        self.scan_page_size = scan_page_size.max(1);
        self
    }

    /// Create a config with a custom write concurrency.
    pub fn with_write_concurrency(mut self, write_concurrency: usize) -> Self {
        self.write_concurrency = write_concurrency.max(1);
        self
    }
}
