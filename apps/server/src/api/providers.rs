use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use sportsfeed_core::health::HealthView;
use sportsfeed_providers::{Capability, ProviderPriorityEntry};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthQuery {
    #[serde(default)]
    include_stale: bool,
}

/// Health records per `(provider, capability)`; stale ones only on request.
async fn get_provider_health(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HealthQuery>,
) -> Json<Vec<HealthView>> {
    let views = state.engine.health.views_at(Utc::now());
    let views = if query.include_stale {
        views
    } else {
        views.into_iter().filter(|v| !v.stale).collect()
    };
    Json(views)
}

async fn get_provider_settings(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ProviderPriorityEntry>> {
    Json(state.engine.registry.settings())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsUpdate {
    provider_id: String,
    capability: Capability,
    priority: Option<i32>,
    enabled: Option<bool>,
}

/// Change one provider's priority or enabled flag for a capability.
///
/// Takes effect on the next fetch.
async fn update_provider_settings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SettingsUpdate>,
) -> ApiResult<Json<Vec<ProviderPriorityEntry>>> {
    let registry = &state.engine.registry;
    if registry.provider(&body.provider_id).is_none() {
        return Err(ApiError::NotFound);
    }

    let current = registry
        .settings()
        .into_iter()
        .find(|e| e.capability == body.capability && e.provider_id.eq_ignore_ascii_case(&body.provider_id))
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "{} does not serve {}",
                body.provider_id, body.capability
            ))
        })?;

    let updated = ProviderPriorityEntry {
        priority: body.priority.unwrap_or(current.priority),
        enabled: body.enabled.unwrap_or(current.enabled),
        ..current
    };
    tracing::info!(
        "Provider setting {}/{} -> priority {}, enabled {}",
        updated.provider_id,
        updated.capability,
        updated.priority,
        updated.enabled
    );
    registry.update(&[updated])?;

    Ok(Json(registry.settings()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/providers", get(get_provider_health))
        .route(
            "/providers/settings",
            get(get_provider_settings).put(update_provider_settings),
        )
}
