//! SQLite implementation of the record store provider.

mod store;

pub use store::SqliteRecordStore;
