//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::IndexConfig;
use crate::opensearch::queries::{build_bulk_body, build_search_query};
use crate::types::{DocumentFailure, RawHit, UploadSummary};
use catalog_shared::{IndexDocument, SearchQuery};

/// OpenSearch client implementation.
///
/// Provides bulk upload and full-text search using OpenSearch as the backend.
///
/// # Example
///
/// ```ignore
/// use catalog_repository::opensearch::{IndexConfig, OpenSearchClient};
/// let client = OpenSearchClient::new("http://localhost:9200", IndexConfig::new("media")).await?;
/// client.ensure_index_exists().await?;
/// let hits = client.search(&SearchQuery::simple("cat", 10)).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index name and settings
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Collect per-document failures from a bulk response body.
    fn parse_bulk_response(body: &Value, total: usize) -> UploadSummary {
        let has_errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);
        if !has_errors {
            return UploadSummary::accepted(total);
        }

        let failures: Vec<DocumentFailure> = body
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    // Each item is keyed by its action name, e.g. {"index": {...}}
                    .filter_map(|item| item.as_object()?.values().next())
                    .filter_map(|result| {
                        let error = result.get("error")?;
                        let id = result
                            .get("_id")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        let reason = error
                            .get("reason")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| error.to_string());
                        Some(DocumentFailure { id, reason })
                    })
                    .collect()
            })
            .unwrap_or_default();

        UploadSummary {
            total,
            accepted: total.saturating_sub(failures.len()),
            failures,
        }
    }

    /// Extract hits from a search response body.
    fn parse_hits(body: &Value) -> Result<Vec<RawHit>, SearchIndexError> {
        let hits = body
            .get("hits")
            .and_then(|hits| hits.get("hits"))
            .and_then(Value::as_array)
            .ok_or_else(|| SearchIndexError::parse("Search response has no hits array"))?;

        hits.iter().map(Self::parse_hit).collect()
    }

    fn parse_hit(hit: &Value) -> Result<RawHit, SearchIndexError> {
        let id = hit
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| SearchIndexError::parse("Search hit has no _id"))?
            .to_string();

        let fields = hit
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_else(Map::new);

        Ok(RawHit { id, fields })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    /// Upload documents with a single `_bulk` request.
    ///
    /// `add` documents become `index` actions keyed by the document id, so
    /// existing documents are replaced. Item-level rejections are reported in
    /// the summary rather than as an error.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn upload_documents(
        &self,
        documents: &[IndexDocument],
    ) -> Result<UploadSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(UploadSummary::accepted(0));
        }

        let body: Vec<JsonBody<Value>> = build_bulk_body(documents)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let refresh = if self.index_config.refresh_on_upload {
            Refresh::WaitFor
        } else {
            Refresh::False
        };

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index_config.name))
            .refresh(refresh)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::upload(format!(
                "Bulk upload failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let summary = Self::parse_bulk_response(&response_body, documents.len());
        if summary.is_complete() {
            debug!(count = summary.accepted, "Bulk upload accepted");
        } else {
            warn!(
                accepted = summary.accepted,
                failed = summary.failures.len(),
                "Bulk upload partially rejected"
            );
        }
        Ok(summary)
    }

    #[instrument(skip(self, query), fields(query = %query.query))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, SearchIndexError> {
        let body = build_search_query(query);

        let response = self
            .client
            .search(SearchParts::Index(&[&self.index_config.name]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let hits = Self::parse_hits(&response_body)?;
        debug!(count = hits.len(), "Search completed");
        Ok(hits)
    }

    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let name = self.index_config.name.as_str();

        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %name, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(self.index_config.get_index_settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another instance may have created it in the meantime
            if error_body.contains("resource_already_exists_exception") {
                return Ok(());
            }
            return Err(SearchIndexError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %name, "Created search index");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let health: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        debug!(status = %status, "OpenSearch cluster health");
        Ok(status == "green" || status == "yellow")
    }
}
