//! In-process implementations of the store and index providers.
//!
//! Used for local development and as the backends of end-to-end tests.

mod index;
mod store;

pub use index::InMemorySearchIndex;
pub use store::InMemoryRecordStore;
