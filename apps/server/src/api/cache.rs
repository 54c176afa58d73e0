use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sportsfeed_core::{service::DataSummary, CacheExport};

use crate::main_lib::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CleanupResult {
    removed: usize,
    remaining: usize,
}

async fn export_cache(State(state): State<Arc<AppState>>) -> Json<CacheExport> {
    Json(state.engine.service.export_all())
}

async fn cleanup_cache(State(state): State<Arc<AppState>>) -> Json<CleanupResult> {
    let removed = state.engine.service.cleanup();
    tracing::info!("Manual cache cleanup removed {} entries", removed);
    Json(CleanupResult {
        removed,
        remaining: state.engine.cache.len(),
    })
}

async fn get_summary(State(state): State<Arc<AppState>>) -> Json<DataSummary> {
    Json(state.engine.service.get_data_summary())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cache", get(export_cache))
        .route("/cache/cleanup", post(cleanup_cache))
        .route("/summary", get(get_summary))
}
