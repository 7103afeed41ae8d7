//! Ordered in-memory record store with keyset pagination.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::StoreError;
use crate::interfaces::RecordStoreProvider;
use crate::types::ScanPage;
use catalog_shared::Record;

/// Record store backed by a `BTreeMap` keyed by record id.
///
/// Scans page through ids in ascending order; a page carries a
/// `last_evaluated_key` only while records remain after it.
#[derive(Default)]
pub struct InMemoryRecordStore {
    items: RwLock<BTreeMap<String, Record>>,
}

impl InMemoryRecordStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Look up a record by id.
    pub async fn get(&self, id: &str) -> Option<Record> {
        self.items.read().await.get(id).cloned()
    }
}

#[async_trait]
impl RecordStoreProvider for InMemoryRecordStore {
    async fn put_item(&self, record: &Record) -> Result<(), StoreError> {
        self.items
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn scan_page(
        &self,
        exclusive_start_key: Option<&str>,
        limit: usize,
    ) -> Result<ScanPage, StoreError> {
        if limit == 0 {
            return Err(StoreError::scan("Scan limit must be positive"));
        }

        let items = self.items.read().await;
        let lower = match exclusive_start_key {
            Some(key) => Bound::Excluded(key.to_string()),
            None => Bound::Unbounded,
        };

        let mut range = items.range((lower, Bound::Unbounded));
        let page: Vec<Record> = range
            .by_ref()
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect();
        let has_more = range.next().is_some();

        let last_evaluated_key = if has_more {
            page.last().map(|record| record.id.clone())
        } else {
            None
        };

        Ok(ScanPage {
            items: page,
            last_evaluated_key,
        })
    }
}
