use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sportsfeed_core::prefetch::{BackoffState, QueryStatus, TickOutcome, TickReport};
use sportsfeed_core::Error as CoreError;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrefetchStatus {
    tick_running: bool,
    interval_secs: u64,
    backoff: Vec<BackoffState>,
    queries: Vec<QueryStatus>,
    last_tick: Option<TickReport>,
}

async fn get_prefetch_status(State(state): State<Arc<AppState>>) -> Json<PrefetchStatus> {
    let scheduler = &state.engine.scheduler;
    Json(PrefetchStatus {
        tick_running: scheduler.is_running_tick(),
        interval_secs: state.engine.config.prefetch_interval_secs,
        backoff: scheduler.backoff_states(),
        queries: scheduler.query_statuses(),
        last_tick: scheduler.last_report(),
    })
}

/// Run one tick now. Returns `Skipped` when a tick is already in flight.
async fn run_prefetch(State(state): State<Arc<AppState>>) -> ApiResult<Json<TickOutcome>> {
    // Spawned so a client disconnect cannot cut the tick short.
    let scheduler = state.engine.scheduler.clone();
    let outcome = tokio::spawn(async move { scheduler.run_tick().await })
        .await
        .map_err(|e| CoreError::Unexpected(format!("prefetch tick aborted: {}", e)))?;
    Ok(Json(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/prefetch/status", get(get_prefetch_status))
        .route("/prefetch/run", post(run_prefetch))
}
