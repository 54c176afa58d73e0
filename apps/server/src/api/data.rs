//! Read surface over the raw data cache.
//!
//! Plain reads never touch a provider. `?fetch=true` takes the consumer path
//! instead: cache first, then a direct aggregator fetch on a miss.
//! `?refresh=true` skips the cache and always asks the providers. Both
//! answer with the resolved envelope, which carries fetch diagnostics when a
//! provider was called.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sportsfeed_providers::DataRequest;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadQuery {
    source: Option<String>,
    #[serde(default)]
    fetch: bool,
    #[serde(default)]
    refresh: bool,
}

impl ReadQuery {
    fn source(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }

    fn goes_upstream(&self) -> bool {
        self.fetch || self.refresh
    }
}

async fn resolve(state: &AppState, request: DataRequest, query: &ReadQuery) -> ApiResult<Response> {
    let service = &state.engine.service;
    let resolved = if query.refresh {
        service.refresh(&request, query.source()).await?
    } else {
        service.resolve(&request, query.source()).await?
    };
    Ok(Json(resolved).into_response())
}

async fn get_live(
    State(state): State<Arc<AppState>>,
    Path(sport): Path<String>,
    Query(query): Query<ReadQuery>,
) -> ApiResult<Response> {
    if query.goes_upstream() {
        return resolve(&state, DataRequest::live(sport), &query).await;
    }
    let items = state.engine.service.get_live_matches(&sport, query.source())?;
    Ok(Json(items).into_response())
}

async fn get_fixtures(
    State(state): State<Arc<AppState>>,
    Path(league): Path<String>,
    Query(query): Query<ReadQuery>,
) -> ApiResult<Response> {
    if query.goes_upstream() {
        return resolve(&state, DataRequest::fixtures(league), &query).await;
    }
    let items = state.engine.service.get_fixtures(&league, query.source())?;
    Ok(Json(items).into_response())
}

async fn get_odds(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
    Query(query): Query<ReadQuery>,
) -> ApiResult<Response> {
    if query.goes_upstream() {
        return resolve(&state, DataRequest::odds(match_id), &query).await;
    }
    let items = state.engine.service.get_odds(&match_id, query.source())?;
    Ok(Json(items).into_response())
}

async fn get_standings(
    State(state): State<Arc<AppState>>,
    Path(league): Path<String>,
    Query(query): Query<ReadQuery>,
) -> ApiResult<Response> {
    if query.goes_upstream() {
        return resolve(&state, DataRequest::standings(league), &query).await;
    }
    let items = state.engine.service.get_standings(&league, query.source())?;
    Ok(Json(items).into_response())
}

/// A cached match with its odds. With `fetch` or `refresh`, odds are
/// brought in from the providers first.
async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
    Query(query): Query<ReadQuery>,
) -> ApiResult<Response> {
    let service = &state.engine.service;
    let odds = DataRequest::odds(match_id.clone());
    if query.refresh {
        service.refresh(&odds, query.source()).await?;
    } else if query.fetch {
        service.resolve(&odds, query.source()).await?;
    }
    let detail = service
        .get_match_detail(&match_id, query.source())?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(detail).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/live/{sport}", get(get_live))
        .route("/fixtures/{league}", get(get_fixtures))
        .route("/odds/{match_id}", get(get_odds))
        .route("/standings/{league}", get(get_standings))
        .route("/matches/{match_id}", get(get_match))
}
