//! Configuration for the catalog API.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{LogFormat, RecordStoreBackend, SearchBackend, Settings};
