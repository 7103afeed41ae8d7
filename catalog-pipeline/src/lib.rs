//! # Catalog Pipeline
//!
//! This crate provides the pipeline components that keep the search index
//! in step with the record store, and answer searches against it.
//!
//! ## Architecture
//!
//! Reindexing follows the Processor-Loader pattern:
//!
//! 1. **Processor**: Transforms records into `add` documents
//! 2. **Loader**: Uploads documents to the index in chunks
//! 3. **Synchronizer**: Scans the store and coordinates the run
//!
//! Searches go through the **Query** translator, which reads the index only.

pub mod errors;
pub mod loader;
pub mod processor;
pub mod query;
pub mod synchronizer;

pub use errors::{QueryError, SyncError};
pub use loader::{IndexLoader, LoaderConfig};
pub use processor::{transform, DocumentProcessor};
pub use query::QueryTranslator;
pub use synchronizer::{IndexSynchronizer, SyncConfig};
