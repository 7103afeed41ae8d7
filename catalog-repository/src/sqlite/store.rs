//! SQLite-backed record store.
//!
//! Records live in a single table keyed by id, with the attribute map stored
//! as a JSON object. Calls go through an r2d2 pool on tokio's blocking pool.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use crate::errors::StoreError;
use crate::interfaces::RecordStoreProvider;
use crate::types::ScanPage;
use catalog_shared::Record;

/// Upper bound on rows reserved up front for one scan page.
const MAX_PREALLOCATED_ROWS: usize = 1024;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Record store persisted in a SQLite database file.
pub struct SqliteRecordStore {
    pool: DbPool,
    table_name: String,
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl SqliteRecordStore {
    /// Open (or create) the database at `path` and ensure the table exists.
    pub fn open(path: impl AsRef<Path>, table_name: &str) -> Result<Self, StoreError> {
        if !is_valid_identifier(table_name) {
            return Err(StoreError::validation(format!(
                "Invalid table name: {}",
                table_name
            )));
        }

        let manager = SqliteConnectionManager::file(path.as_ref());
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let store = Self {
            pool,
            table_name: table_name.to_string(),
        };
        store.create_table()?;

        info!(
            path = %path.as_ref().display(),
            table = %table_name,
            "Opened SQLite record store"
        );
        Ok(store)
    }

    fn create_table(&self) -> Result<(), StoreError> {
        let conn = self.connection()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                fields TEXT NOT NULL
            );",
            self.table_name
        ))
        .map_err(|e| StoreError::connection(e.to_string()))
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::connection(e.to_string()))
    }

    /// Run a blocking closure against a pooled connection.
    async fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection, &str) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let table_name = self.table_name.clone();

        tokio::task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| StoreError::connection(e.to_string()))?;
            f(&*conn, &table_name)
        })
        .await
        .map_err(|e| StoreError::connection(format!("Blocking task failed: {}", e)))?
    }
}

#[async_trait]
impl RecordStoreProvider for SqliteRecordStore {
    async fn put_item(&self, record: &Record) -> Result<(), StoreError> {
        let id = record.id.clone();
        let fields = serde_json::to_string(&record.fields)
            .map_err(|e| StoreError::write(e.to_string()))?;

        self.with_connection(move |conn, table| {
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, fields) VALUES (?1, ?2)
                     ON CONFLICT(id) DO UPDATE SET fields = excluded.fields",
                    table
                ),
                params![id, fields],
            )
            .map(|_| ())
            .map_err(|e| StoreError::write(e.to_string()))
        })
        .await
    }

    async fn scan_page(
        &self,
        exclusive_start_key: Option<&str>,
        limit: usize,
    ) -> Result<ScanPage, StoreError> {
        if limit == 0 {
            return Err(StoreError::scan("Scan limit must be positive"));
        }
        let start_key = exclusive_start_key.map(str::to_string);

        self.with_connection(move |conn, table| {
            // One extra row tells us whether another page follows.
            let fetch = i64::try_from(limit.saturating_add(1)).unwrap_or(i64::MAX);
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT id, fields FROM {} WHERE ?1 IS NULL OR id > ?1 ORDER BY id LIMIT ?2",
                    table
                ))
                .map_err(|e| StoreError::scan(e.to_string()))?;

            let rows = stmt
                .query_map(params![start_key, fetch], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|e| StoreError::scan(e.to_string()))?;

            let mut items = Vec::with_capacity(limit.min(MAX_PREALLOCATED_ROWS));
            let mut has_more = false;
            for row in rows {
                let (id, raw_fields) = row.map_err(|e| StoreError::scan(e.to_string()))?;
                if items.len() == limit {
                    has_more = true;
                    break;
                }
                let fields: BTreeMap<String, String> = serde_json::from_str(&raw_fields)
                    .map_err(|e| StoreError::corrupt(&id, e.to_string()))?;
                items.push(Record { id, fields });
            }

            let last_evaluated_key = if has_more {
                items.last().map(|record: &Record| record.id.clone())
            } else {
                None
            };

            Ok(ScanPage {
                items,
                last_evaluated_key,
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RecordStoreClient;
    use crate::config::RecordStoreConfig;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> SqliteRecordStore {
        SqliteRecordStore::open(dir.path().join("catalog.db"), "media_records").unwrap()
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("media_records"));
        assert!(is_valid_identifier("_t1"));
        assert!(!is_valid_identifier("1table"));
        assert!(!is_valid_identifier("drop table; --"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_open_rejects_bad_table_name() {
        let dir = TempDir::new().unwrap();
        let result = SqliteRecordStore::open(dir.path().join("catalog.db"), "bad name");
        assert!(matches!(result, Err(StoreError::ValidationError(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_put_and_scan() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.put_item(&Record::new("v1", "A")).await.unwrap();
        store.put_item(&Record::new("v2", "B")).await.unwrap();

        let page = store.scan_page(None, 10).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0], Record::new("v1", "A"));
        assert!(page.last_evaluated_key.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_scan_with_unbounded_limit() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.put_item(&Record::new("v1", "A")).await.unwrap();

        for limit in [1_000_000_000_000, usize::MAX] {
            let page = store.scan_page(None, limit).await.unwrap();
            assert_eq!(page.items, vec![Record::new("v1", "A")]);
            assert!(page.last_evaluated_key.is_none());
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_replaces_fields() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store
            .put_item(&Record::new("v1", "A").with_field("genre", "drama"))
            .await
            .unwrap();
        store.put_item(&Record::new("v1", "B")).await.unwrap();

        let page = store.scan_page(None, 10).await.unwrap();
        assert_eq!(page.items, vec![Record::new("v1", "B")]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pages_through_client() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open_store(&dir));
        let client = RecordStoreClient::with_config(
            store.clone(),
            RecordStoreConfig::default().with_scan_page_size(3),
        );

        let pairs: Vec<Vec<String>> = (0..10)
            .map(|i| vec![format!("v{:02}", i), format!("Title {}", i)])
            .collect();
        client.put(pairs).await.unwrap();

        let first = store.scan_page(None, 3).await.unwrap();
        assert_eq!(first.last_evaluated_key.as_deref(), Some("v02"));

        let records = client.scan_all().await.unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[9].id, "v09");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reopen_keeps_records() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            store.put_item(&Record::new("v1", "A")).await.unwrap();
        }

        let store = open_store(&dir);
        let page = store.scan_page(None, 10).await.unwrap();
        assert_eq!(page.items.len(), 1);
    }
}
