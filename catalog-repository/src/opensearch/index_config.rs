//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the media search index.

use serde_json::{json, Value};

/// Default name of the search index.
pub const DEFAULT_INDEX_NAME: &str = "media";

/// Where and how documents are indexed.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Index name documents are uploaded to and searched in.
    pub name: String,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    /// Make uploaded documents visible to search before the upload returns.
    pub refresh_on_upload: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME)
    }
}

impl IndexConfig {
    /// Create a new index config with one shard and one replica.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number_of_shards: 1,
            number_of_replicas: 1,
            refresh_on_upload: true,
        }
    }

    /// Get the index settings and mappings for the media index.
    ///
    /// Every string attribute is mapped to `text` (no keyword sub-field), so a
    /// `fields: ["*"]` search returns exactly one entry per record attribute.
    pub fn get_index_settings(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.number_of_shards,
                "number_of_replicas": self.number_of_replicas
            },
            "mappings": {
                "dynamic_templates": [
                    {
                        "strings_as_text": {
                            "match_mapping_type": "string",
                            "mapping": { "type": "text" }
                        }
                    }
                ],
                "properties": {
                    "title": { "type": "text" }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = IndexConfig::default().get_index_settings();

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());
        assert_eq!(settings["mappings"]["properties"]["title"]["type"], "text");
        assert_eq!(
            settings["mappings"]["dynamic_templates"][0]["strings_as_text"]["mapping"]["type"],
            "text"
        );
    }

    #[test]
    fn test_default_index_name() {
        assert_eq!(IndexConfig::default().name, "media");
    }
}
