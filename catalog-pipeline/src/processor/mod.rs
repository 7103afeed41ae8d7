//! Processor module for the catalog pipeline.
//!
//! Transforms store records into search documents.

mod document_processor;

pub use document_processor::{transform, DocumentProcessor};
