//! Engine context.
//!
//! Built once at process start and shared by reference. Tests build their
//! own isolated instances.

use std::sync::Arc;

use log::info;
use sportsfeed_providers::{ProviderRegistry, SportsDataProvider};

use crate::aggregator::Aggregator;
use crate::cache::RawDataCache;
use crate::config::EngineConfig;
use crate::events::PrefetchEventSink;
use crate::health::ProviderHealthTracker;
use crate::prefetch::{BackoffTable, PrefetchScheduler};
use crate::service::SportsDataService;

pub struct EngineContext {
    pub config: EngineConfig,
    pub cache: Arc<RawDataCache>,
    pub health: Arc<ProviderHealthTracker>,
    pub registry: Arc<ProviderRegistry>,
    pub aggregator: Arc<Aggregator>,
    pub scheduler: Arc<PrefetchScheduler>,
    pub service: Arc<SportsDataService>,
}

impl EngineContext {
    pub fn new(
        config: EngineConfig,
        providers: Vec<Arc<dyn SportsDataProvider>>,
        sink: Arc<dyn PrefetchEventSink>,
    ) -> Self {
        let provider_ids: Vec<&'static str> = providers.iter().map(|p| p.id()).collect();

        let registry = Arc::new(
            ProviderRegistry::new(providers)
                .with_timeout(config.provider_timeout())
                .with_timeout_overrides(config.provider_timeout_overrides()),
        );
        let cache = Arc::new(RawDataCache::new());
        let health = Arc::new(ProviderHealthTracker::new(config.health_stale_secs));
        let aggregator = Arc::new(Aggregator::new(
            registry.clone(),
            cache.clone(),
            health.clone(),
            config.ttls.clone(),
        ));
        let scheduler = Arc::new(PrefetchScheduler::new(
            aggregator.clone(),
            cache.clone(),
            sink,
            config.watched.clone(),
            config.prefetch_interval(),
            BackoffTable::new(config.backoff_base_secs, config.backoff_max_secs),
        ));
        let service = Arc::new(SportsDataService::new(
            cache.clone(),
            aggregator.clone(),
            scheduler.clone(),
        ));

        info!(
            "Engine context ready: providers {:?}, {} watched queries",
            provider_ids,
            config.watched.len()
        );

        Self {
            config,
            cache,
            health,
            registry,
            aggregator,
            scheduler,
            service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoOpEventSink;
    use crate::prefetch::WatchedQuery;
    use crate::test_support::{Script, ScriptedProvider};
    use sportsfeed_providers::DataRequest;

    #[tokio::test]
    async fn test_contexts_are_isolated() {
        let config = EngineConfig {
            watched: vec![WatchedQuery::new(DataRequest::live("soccer"))],
            ..EngineConfig::default()
        };
        let first = EngineContext::new(
            config.clone(),
            vec![ScriptedProvider::new("A", 1, Script::Items(vec!["1"])) as Arc<dyn SportsDataProvider>],
            Arc::new(NoOpEventSink),
        );
        let second = EngineContext::new(config, vec![], Arc::new(NoOpEventSink));

        first.scheduler.run_tick().await;

        assert!(first.cache.get("live:soccer").is_some());
        assert!(second.cache.is_empty());
        assert!(second.health.get_all().is_empty());
    }
}
