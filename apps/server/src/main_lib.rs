use std::sync::Arc;

use crate::{config::Config, events::EventBus};
use sportsfeed_core::EngineContext;
use sportsfeed_providers::{ApiFootballProvider, SportsDataProvider, TheSportsDbProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub engine: Arc<EngineContext>,
    pub event_bus: EventBus,
}

pub fn init_tracing() {
    let log_format = std::env::var("SF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Adapters enabled by the current configuration.
pub fn configured_providers(config: &Config) -> Vec<Arc<dyn SportsDataProvider>> {
    let mut providers: Vec<Arc<dyn SportsDataProvider>> = Vec::new();

    match &config.api_football_key {
        Some(key) => providers.push(Arc::new(ApiFootballProvider::new(key.clone()))),
        None => tracing::info!("SF_API_FOOTBALL_KEY not set, api-football disabled"),
    }
    providers.push(Arc::new(TheSportsDbProvider::new(
        config.thesportsdb_key.clone(),
    )));

    providers
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_providers(config, configured_providers(config)).await
}

pub async fn build_state_with_providers(
    config: &Config,
    providers: Vec<Arc<dyn SportsDataProvider>>,
) -> anyhow::Result<Arc<AppState>> {
    let event_bus = EventBus::new(config.engine.event_capacity);
    let engine = Arc::new(EngineContext::new(
        config.engine.clone(),
        providers,
        Arc::new(event_bus.clone()),
    ));

    tracing::info!(
        "Engine ready: {} provider(s), {} watched, tick every {}s",
        engine.registry.providers().len(),
        engine.scheduler.watched().len(),
        config.engine.prefetch_interval_secs
    );

    Ok(Arc::new(AppState { engine, event_bus }))
}
