//! Dependency initialization and wiring for the catalog API.

use std::sync::Arc;

use tracing::info;

use crate::config::{RecordStoreBackend, SearchBackend, Settings};
use crate::routes::AppState;
use crate::ApiError;
use catalog_pipeline::{IndexLoader, IndexSynchronizer, LoaderConfig, QueryTranslator, SyncConfig};
use catalog_repository::{
    IndexConfig, InMemoryRecordStore, InMemorySearchIndex, OpenSearchClient, RecordStoreClient,
    RecordStoreConfig, RecordStoreProvider, SearchIndexProvider, SqliteRecordStore,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared handles served to every request.
    pub state: AppState,
}

impl Dependencies {
    /// Build every client once from the resolved settings.
    ///
    /// The search backend must pass its health check, and its index is
    /// created when missing, before the server starts accepting requests.
    pub async fn new(settings: &Settings) -> Result<Self, ApiError> {
        info!(
            record_store = ?settings.record_store_backend,
            search_backend = ?settings.search_backend,
            "Initializing dependencies"
        );

        let store = Self::record_store(settings)?;
        let index = Self::search_index(settings).await?;

        let healthy = index
            .health_check()
            .await
            .map_err(|e| ApiError::config(format!("Search index health check failed: {}", e)))?;

        if !healthy {
            return Err(ApiError::config("Search index is unhealthy"));
        }

        index
            .ensure_index_exists()
            .await
            .map_err(|e| ApiError::config(format!("Failed to prepare search index: {}", e)))?;

        info!("Search index connection verified");

        Ok(Self {
            state: Self::wire(settings, store, index),
        })
    }

    /// Assemble the pipeline around already-built providers.
    pub fn wire(
        settings: &Settings,
        store: Arc<dyn RecordStoreProvider>,
        index: Arc<dyn SearchIndexProvider>,
    ) -> AppState {
        let records = Arc::new(RecordStoreClient::with_config(
            store,
            RecordStoreConfig::default()
                .with_scan_page_size(settings.scan_page_size)
                .with_write_concurrency(settings.write_concurrency),
        ));

        let loader = IndexLoader::with_config(
            index.clone(),
            LoaderConfig {
                batch_size: settings.upload_batch_size,
                max_retries: settings.upload_max_retries,
                retry_backoff_ms: settings.upload_retry_backoff_ms,
            },
        );

        let synchronizer = IndexSynchronizer::with_config(
            records.clone(),
            loader,
            SyncConfig {
                timeout: settings.reindex_timeout,
                exclusive: settings.reindex_exclusive,
            },
        );

        let translator = QueryTranslator::new(index).with_max_results(settings.search_max_results);

        AppState {
            records,
            synchronizer: Arc::new(synchronizer),
            translator: Arc::new(translator),
        }
    }

    fn record_store(settings: &Settings) -> Result<Arc<dyn RecordStoreProvider>, ApiError> {
        match settings.record_store_backend {
            RecordStoreBackend::Memory => Ok(Arc::new(InMemoryRecordStore::new())),
            RecordStoreBackend::Sqlite => {
                let store = SqliteRecordStore::open(&settings.sqlite_path, &settings.record_table_name)
                    .map_err(|e| ApiError::config(format!("Failed to open record store: {}", e)))?;
                info!(path = %settings.sqlite_path, table = %settings.record_table_name, "SQLite record store opened");
                Ok(Arc::new(store))
            }
        }
    }

    async fn search_index(settings: &Settings) -> Result<Arc<dyn SearchIndexProvider>, ApiError> {
        match settings.search_backend {
            SearchBackend::Memory => Ok(Arc::new(InMemorySearchIndex::new())),
            SearchBackend::OpenSearch => {
                let client = OpenSearchClient::new(
                    &settings.opensearch_url,
                    IndexConfig::new(settings.search_index_name.clone()),
                )
                .await
                .map_err(|e| ApiError::config(format!("Failed to create OpenSearch client: {}", e)))?;
                info!(url = %settings.opensearch_url, index = %settings.search_index_name, "OpenSearch client created");
                Ok(Arc::new(client))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "SEARCH_BACKEND" => Some("memory".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_backends_wire_up() {
        let dependencies = Dependencies::new(&memory_settings()).await.unwrap();

        let written = dependencies
            .state
            .records
            .put(vec![vec!["v1".to_string(), "A".to_string()]])
            .await
            .unwrap();
        let documents = dependencies.state.synchronizer.reindex().await.unwrap();

        assert_eq!(written, 1);
        assert_eq!(documents.len(), 1);
    }
}
