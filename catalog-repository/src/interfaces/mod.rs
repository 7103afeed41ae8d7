//! Interface definitions for the record store and the search index.
//!
//! The traits here are the dependency-injection seams: application code holds
//! `Arc<dyn ...>` handles built once at startup, and tests swap in mocks.

mod record_store_provider;
mod search_index_provider;

pub use record_store_provider::RecordStoreProvider;
pub use search_index_provider::SearchIndexProvider;
