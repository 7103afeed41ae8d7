//! # Catalog Shared
//!
//! Data model shared by the media catalog crates: records held by the primary
//! store, documents uploaded to the search index, and the hits returned to
//! API clients.

mod document;
mod record;
mod search;

pub use document::{DocumentOperation, IndexDocument};
pub use record::{Record, ID_FIELD, TITLE_FIELD};
pub use search::{FieldValue, QueryParser, SearchHit, SearchQuery};
