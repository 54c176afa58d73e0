use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sportsfeed_core::prefetch::WatchedQuery;
use sportsfeed_core::EngineConfig;
use sportsfeed_providers::{
    Capability, DataRequest, MatchItem, MatchStatus, ProviderCapabilities, SportsDataError,
    SportsDataProvider,
};
use sportsfeed_server::{api::app_router, build_state_with_providers, config::Config};
use tower::ServiceExt;

/// Serves two live soccer matches; fixtures always fail.
struct StubProvider;

#[async_trait]
impl SportsDataProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    fn priority(&self) -> i32 {
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            capabilities: &[Capability::Live, Capability::Fixtures],
            sports: &["soccer"],
            timeout: None,
        }
    }

    async fn fetch_live(&self, _sport: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        Ok(vec![stub_match("100", "Arsenal", "Chelsea"), stub_match("101", "Lazio", "Roma")])
    }

    async fn fetch_fixtures(&self, _league_id: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        Err(SportsDataError::ProviderError {
            provider: "STUB".to_string(),
            message: "upstream 503".to_string(),
        })
    }
}

fn stub_match(id: &str, home: &str, away: &str) -> MatchItem {
    MatchItem {
        id: id.to_string(),
        home: home.to_string(),
        away: away.to_string(),
        score_home: Some(1),
        score_away: Some(0),
        status: MatchStatus::Live,
        start_time: None,
        league_id: Some("39".to_string()),
        provider_id: String::new(),
    }
}

async fn build_test_router() -> Router {
    let config = Config {
        prefetch_enabled: false,
        engine: EngineConfig {
            watched: vec![
                WatchedQuery::new(DataRequest::live("soccer")),
                WatchedQuery::new(DataRequest::fixtures("39")),
            ],
            ..EngineConfig::default()
        },
        ..Config::default()
    };
    let provider: Arc<dyn SportsDataProvider> = Arc::new(StubProvider);
    let state = build_state_with_providers(&config, vec![provider])
        .await
        .unwrap();
    app_router(state, &config)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = build_test_router().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn manual_tick_warms_cache_and_backs_off_failures() {
    let app = build_test_router().await;

    let (status, body) = send(&app, Method::POST, "/api/v1/prefetch/run", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["report"]["refreshed"], 1);
    assert_eq!(body["report"]["failed"], 1);

    let (status, live) = send(&app, Method::GET, "/api/v1/live/soccer", None).await;
    assert_eq!(status, StatusCode::OK);
    let live = live.as_array().unwrap();
    assert_eq!(live.len(), 2);
    assert!(live.iter().all(|m| m["providerId"] == "STUB"));

    let (_, filtered) = send(&app, Method::GET, "/api/v1/live/soccer?source=OTHER", None).await;
    assert_eq!(filtered, json!([]));

    let (_, prefetch) = send(&app, Method::GET, "/api/v1/prefetch/status", None).await;
    let backoff = prefetch["backoff"].as_array().unwrap();
    assert_eq!(backoff.len(), 1);
    assert_eq!(backoff[0]["query"], "fixtures:39");
    assert_eq!(backoff[0]["consecutiveFailures"], 1);
    assert_eq!(prefetch["lastTick"]["refreshed"], 1);

    let (_, summary) = send(&app, Method::GET, "/api/v1/summary", None).await;
    assert_eq!(summary["totalEntries"], 1);

    let (_, health) = send(&app, Method::GET, "/api/v1/health/providers", None).await;
    let health = health.as_array().unwrap();
    assert_eq!(health.len(), 2);
    let live_record = health
        .iter()
        .find(|r| r["capability"] == "live")
        .unwrap();
    assert_eq!(live_record["ok"], true);
    assert_eq!(live_record["stale"], false);
    let fixtures_record = health
        .iter()
        .find(|r| r["capability"] == "fixtures")
        .unwrap();
    assert_eq!(fixtures_record["ok"], false);
}

#[tokio::test]
async fn match_detail_comes_from_cached_lists() {
    let app = build_test_router().await;

    let (status, _) = send(&app, Method::GET, "/api/v1/matches/100", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, Method::POST, "/api/v1/prefetch/run", None).await;

    let (status, detail) = send(&app, Method::GET, "/api/v1/matches/100", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["home"], "Arsenal");
    assert_eq!(detail["odds"], json!([]));
}

#[tokio::test]
async fn malformed_identifiers_are_bad_requests() {
    let app = build_test_router().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/fixtures/a:b", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn refresh_reports_diagnostics_on_exhausted_chain() {
    let app = build_test_router().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/fixtures/39?refresh=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fromCache"], false);
    assert_eq!(body["payload"]["items"], json!([]));
    let attempts = body["diagnostics"]["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0]["providerId"], "STUB");

    let (_, cache) = send(&app, Method::GET, "/api/v1/cache", None).await;
    assert_eq!(cache["entries"], json!([]));
}

#[tokio::test]
async fn fetch_reads_cache_but_refresh_always_goes_upstream() {
    let app = build_test_router().await;

    let (_, first) = send(&app, Method::GET, "/api/v1/live/soccer?fetch=true", None).await;
    assert_eq!(first["fromCache"], false);
    assert_eq!(first["providerId"], "STUB");

    let (_, second) = send(&app, Method::GET, "/api/v1/live/soccer?fetch=true", None).await;
    assert_eq!(second["fromCache"], true);
    assert_eq!(second["payload"]["items"].as_array().unwrap().len(), 2);

    let (status, refreshed) = send(&app, Method::GET, "/api/v1/live/soccer?refresh=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["fromCache"], false);
    assert_eq!(refreshed["diagnostics"]["attempts"][0]["providerId"], "STUB");
}

#[tokio::test]
async fn provider_settings_can_be_changed() {
    let app = build_test_router().await;

    let (status, settings) = send(&app, Method::GET, "/api/v1/providers/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings.as_array().unwrap().len(), 2);

    let (status, settings) = send(
        &app,
        Method::PUT,
        "/api/v1/providers/settings",
        Some(json!({ "providerId": "STUB", "capability": "live", "enabled": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let live = settings
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["capability"] == "live")
        .unwrap();
    assert_eq!(live["enabled"], false);
    assert_eq!(live["priority"], 1);

    // Disabled: the tick has no provider for live and caches nothing.
    let (_, tick) = send(&app, Method::POST, "/api/v1/prefetch/run", None).await;
    assert_eq!(tick["report"]["refreshed"], 0);
    let (_, live) = send(&app, Method::GET, "/api/v1/live/soccer", None).await;
    assert_eq!(live, json!([]));

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/providers/settings",
        Some(json!({ "providerId": "NOPE", "capability": "live", "priority": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/providers/settings",
        Some(json!({ "providerId": "STUB", "capability": "odds", "priority": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cache_cleanup_reports_counts() {
    let app = build_test_router().await;
    send(&app, Method::POST, "/api/v1/prefetch/run", None).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/cache/cleanup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 0);
    assert_eq!(body["remaining"], 1);
}
