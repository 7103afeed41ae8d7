//! Document processor implementation.
//!
//! Transforms records into IndexDocument structures for indexing.

use tracing::{debug, instrument};

use catalog_shared::{IndexDocument, Record, ID_FIELD};

/// Map one record to its `add` document.
///
/// The id moves to `IndexDocument.id`; every other attribute is copied into
/// `fields` unchanged. A stray `id` attribute is never duplicated into the
/// fields. Records without attributes map to documents with empty fields.
pub fn transform(record: &Record) -> IndexDocument {
    let fields = record
        .fields
        .iter()
        .filter(|(name, _)| name.as_str() != ID_FIELD)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    IndexDocument::add(record.id.clone(), fields)
}

/// Processor that transforms records into search documents.
#[derive(Debug, Default)]
pub struct DocumentProcessor;

impl DocumentProcessor {
    /// Create a new document processor.
    pub fn new() -> Self {
        Self
    }

    /// Process a full record set into documents, one per record, in input order.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub fn process_batch(&self, records: &[Record]) -> Vec<IndexDocument> {
        let documents: Vec<IndexDocument> = records.iter().map(transform).collect();
        debug!(document_count = documents.len(), "Processed record batch");
        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_shared::DocumentOperation;
    use std::collections::BTreeMap;

    #[test]
    fn test_transform_title_record() {
        let document = transform(&Record::new("v1", "A"));

        let mut expected_fields = BTreeMap::new();
        expected_fields.insert("title".to_string(), "A".to_string());

        assert_eq!(document.operation, DocumentOperation::Add);
        assert_eq!(document.id, "v1");
        assert_eq!(document.fields, expected_fields);
    }

    #[test]
    fn test_transform_keeps_extra_fields() {
        let record = Record::new("v1", "A").with_field("genre", "drama");

        let document = transform(&record);

        assert_eq!(document.fields.len(), 2);
        assert_eq!(document.fields["genre"], "drama");
    }

    #[test]
    fn test_transform_empty_fields() {
        let document = transform(&Record::bare("v1"));

        assert_eq!(document.id, "v1");
        assert!(document.fields.is_empty());
    }

    #[test]
    fn test_transform_drops_id_attribute() {
        let record = Record::new("v1", "A").with_field("id", "shadow");

        let document = transform(&record);

        assert_eq!(document.id, "v1");
        assert!(!document.fields.contains_key("id"));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let record = Record::new("v1", "A").with_field("b", "2").with_field("a", "1");
        assert_eq!(transform(&record), transform(&record));
    }

    #[test]
    fn test_process_batch() {
        let processor = DocumentProcessor::new();
        let records = vec![
            Record::new("v1", "A"),
            Record::new("v2", "B"),
            Record::bare("v3"),
        ];

        let documents = processor.process_batch(&records);

        assert_eq!(documents.len(), 3);
        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn test_process_empty_batch() {
        let processor = DocumentProcessor::new();
        assert!(processor.process_batch(&[]).is_empty());
    }
}
