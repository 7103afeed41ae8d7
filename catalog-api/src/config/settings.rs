//! Settings resolved from the environment at process start.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::ApiError;

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default SQLite database path.
const DEFAULT_SQLITE_PATH: &str = "catalog.db";

/// Default record table name.
const DEFAULT_RECORD_TABLE_NAME: &str = "media_records";

/// Default records per scan page.
const DEFAULT_SCAN_PAGE_SIZE: usize = 100;

/// Default number of concurrent writes during ingestion.
const DEFAULT_WRITE_CONCURRENCY: usize = 1;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default search index name.
const DEFAULT_SEARCH_INDEX_NAME: &str = "media";

/// Default documents per bulk upload.
const DEFAULT_UPLOAD_BATCH_SIZE: usize = 1000;

/// Default extra attempts per upload chunk.
const DEFAULT_UPLOAD_MAX_RETRIES: u32 = 2;

/// Default initial retry backoff in milliseconds.
const DEFAULT_UPLOAD_RETRY_BACKOFF_MS: u64 = 200;

/// Default number of hits requested per search.
const DEFAULT_SEARCH_MAX_RESULTS: usize = 10;

/// Upper bound for page, batch and result sizes.
const MAX_SIZE: usize = 10_000;

/// Upper bound for concurrent ingestion writes.
const MAX_WRITE_CONCURRENCY: usize = 256;

/// Which record store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStoreBackend {
    Memory,
    Sqlite,
}

impl FromStr for RecordStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown record store backend '{}'", other)),
        }
    }
}

/// Which search index implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBackend {
    OpenSearch,
    Memory,
}

impl FromStr for SearchBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opensearch" => Ok(Self::OpenSearch),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown search backend '{}'", other)),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Process-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub record_store_backend: RecordStoreBackend,
    pub sqlite_path: String,
    pub record_table_name: String,
    pub scan_page_size: usize,
    pub write_concurrency: usize,
    pub search_backend: SearchBackend,
    pub opensearch_url: String,
    pub search_index_name: String,
    pub upload_batch_size: usize,
    pub upload_max_retries: u32,
    pub upload_retry_backoff_ms: u64,
    pub reindex_timeout: Option<Duration>,
    pub reindex_exclusive: bool,
    pub search_max_results: usize,
    pub log_format: LogFormat,
}

impl Settings {
    /// Resolve settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BIND_ADDR`: listen address (default: 0.0.0.0:8080)
    /// - `RECORD_STORE_BACKEND`: `memory` or `sqlite` (default: memory)
    /// - `SQLITE_PATH`: database file (default: catalog.db)
    /// - `RECORD_TABLE_NAME`: record table (default: media_records)
    /// - `SCAN_PAGE_SIZE`: records per scan page (default: 100)
    /// - `WRITE_CONCURRENCY`: concurrent ingestion writes (default: 1)
    /// - `SEARCH_BACKEND`: `opensearch` or `memory` (default: opensearch)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `SEARCH_INDEX_NAME`: index name (default: media)
    /// - `UPLOAD_BATCH_SIZE`: documents per bulk request (default: 1000)
    /// - `UPLOAD_MAX_RETRIES`: extra attempts per chunk (default: 2)
    /// - `UPLOAD_RETRY_BACKOFF_MS`: first retry delay (default: 200)
    /// - `REINDEX_TIMEOUT_SECS`: reindex deadline (default: none)
    /// - `REINDEX_EXCLUSIVE`: serialize reindex runs (default: false)
    /// - `SEARCH_MAX_RESULTS`: hits per search (default: 10)
    /// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let reindex_timeout = match lookup("REINDEX_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(Duration::from_secs(parse_value("REINDEX_TIMEOUT_SECS", &raw)?)),
            None => None,
        };

        Ok(Self {
            bind_addr: string("BIND_ADDR", DEFAULT_BIND_ADDR),
            record_store_backend: parse_or(&lookup, "RECORD_STORE_BACKEND", RecordStoreBackend::Memory)?,
            sqlite_path: string("SQLITE_PATH", DEFAULT_SQLITE_PATH),
            record_table_name: string("RECORD_TABLE_NAME", DEFAULT_RECORD_TABLE_NAME),
            scan_page_size: parse_size(&lookup, "SCAN_PAGE_SIZE", DEFAULT_SCAN_PAGE_SIZE, MAX_SIZE)?,
            write_concurrency: parse_size(&lookup, "WRITE_CONCURRENCY", DEFAULT_WRITE_CONCURRENCY, MAX_WRITE_CONCURRENCY)?,
            search_backend: parse_or(&lookup, "SEARCH_BACKEND", SearchBackend::OpenSearch)?,
            opensearch_url: string("OPENSEARCH_URL", DEFAULT_OPENSEARCH_URL),
            search_index_name: string("SEARCH_INDEX_NAME", DEFAULT_SEARCH_INDEX_NAME),
            upload_batch_size: parse_size(&lookup, "UPLOAD_BATCH_SIZE", DEFAULT_UPLOAD_BATCH_SIZE, MAX_SIZE)?,
            upload_max_retries: parse_or(&lookup, "UPLOAD_MAX_RETRIES", DEFAULT_UPLOAD_MAX_RETRIES)?,
            upload_retry_backoff_ms: parse_or(
                &lookup,
                "UPLOAD_RETRY_BACKOFF_MS",
                DEFAULT_UPLOAD_RETRY_BACKOFF_MS,
            )?,
            reindex_timeout,
            reindex_exclusive: parse_or(&lookup, "REINDEX_EXCLUSIVE", false)?,
            search_max_results: parse_size(&lookup, "SEARCH_MAX_RESULTS", DEFAULT_SEARCH_MAX_RESULTS, MAX_SIZE)?,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ApiError::config(format!("Invalid {}='{}': {}", key, raw, e)))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ApiError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

/// Parse a size that must fall within `1..=max`.
fn parse_size<F>(lookup: &F, key: &str, default: usize, max: usize) -> Result<usize, ApiError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value == 0 || value > max {
        return Err(ApiError::config(format!(
            "Invalid {}={}: must be between 1 and {}",
            key, value, max
        )));
    }
    Ok(value)
}
