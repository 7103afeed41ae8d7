//! # Catalog API
//!
//! HTTP front end for the media catalog.
//!
//! This crate provides the configuration, dependency wiring and routes for
//! serving ingestion, reindexing, read-all and search over axum.

pub mod config;
pub mod routes;

pub use config::{Dependencies, Settings};
pub use routes::{router, AppState};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_pipeline::{QueryError, SyncError};
use catalog_repository::StoreError;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur during startup or while serving a request.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The request was malformed; nothing was changed.
    #[error("{0}")]
    BadRequest(String),

    /// Record store error.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Reindex error.
    #[error("Reindex error: {0}")]
    SyncError(#[from] SyncError),

    /// Search error.
    #[error("Search error: {0}")]
    QueryError(#[from] QueryError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a bad request error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::StoreError(_) | Self::QueryError(_) => StatusCode::BAD_GATEWAY,
            Self::SyncError(SyncError::TimedOut(_)) => StatusCode::GATEWAY_TIMEOUT,
            Self::SyncError(_) => StatusCode::BAD_GATEWAY,
            Self::ConfigError(_) | Self::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_validation() {
            Self::BadRequest(err.to_string())
        } else {
            Self::StoreError(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from(StoreError::validation("Item 0 must contain exactly 2 elements"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_failure_maps_to_bad_gateway() {
        let err = ApiError::from(StoreError::connection("refused"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_sync_status_codes() {
        let timed_out = ApiError::from(SyncError::TimedOut(Duration::from_secs(30)));
        let upload = ApiError::from(SyncError::UploadFailed {
            chunk: 0,
            attempts: 3,
            reason: "bulk rejected".to_string(),
            rejected_ids: vec![],
        });

        assert_eq!(timed_out.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(upload.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::from(SyncError::source_unavailable("down")).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_query_failure_maps_to_bad_gateway() {
        let err = ApiError::from(QueryError::backend_unavailable("down"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
