//! HTTP routes for the catalog API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ApiError;
use catalog_pipeline::{IndexSynchronizer, QueryTranslator};
use catalog_repository::RecordStoreClient;
use catalog_shared::{IndexDocument, Record, SearchHit};

const WELCOME: &str = "Welcome to the media catalog API";

/// Long-lived handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordStoreClient>,
    pub synchronizer: Arc<IndexSynchronizer>,
    pub translator: Arc<QueryTranslator>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddResponse {
    pub written: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/add", post(handle_add))
        .route("/update", get(handle_update))
        .route("/all", get(handle_all))
        .route("/search", get(handle_search))
        .with_state(state)
}

async fn handle_root() -> &'static str {
    WELCOME
}

async fn handle_add(
    State(state): State<AppState>,
    payload: Result<Json<Vec<Vec<String>>>, JsonRejection>,
) -> Result<Json<AddResponse>, ApiError> {
    let Json(pairs) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let written = state.records.put(pairs).await?;
    info!(count = written, "Records ingested");
    Ok(Json(AddResponse { written }))
}

async fn handle_update(
    State(state): State<AppState>,
) -> Result<Json<Vec<IndexDocument>>, ApiError> {
    let documents = state.synchronizer.reindex().await?;
    Ok(Json(documents))
}

async fn handle_all(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.records.scan_all().await?;
    Ok(Json(records))
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let query = params
        .q
        .ok_or_else(|| ApiError::bad_request("Missing required query parameter 'q'"))?;
    let hits = state.translator.search(&query).await?;
    Ok(Json(hits))
}
