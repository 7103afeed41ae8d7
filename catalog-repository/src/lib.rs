//! # Catalog Repository
//!
//! This crate provides traits and implementations for the two backends of the
//! media catalog: the primary record store and the search index. It includes
//! the error types, the provider interfaces, the typed record store adapter,
//! and concrete in-memory, SQLite and OpenSearch implementations.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod sqlite;
pub mod types;

pub use client::RecordStoreClient;
pub use config::RecordStoreConfig;
pub use errors::{SearchIndexError, StoreError};
pub use interfaces::{RecordStoreProvider, SearchIndexProvider};
pub use memory::{InMemoryRecordStore, InMemorySearchIndex};
pub use crate::opensearch::{IndexConfig, OpenSearchClient};
pub use sqlite::SqliteRecordStore;
pub use types::{DocumentFailure, RawHit, ScanPage, UploadSummary};
