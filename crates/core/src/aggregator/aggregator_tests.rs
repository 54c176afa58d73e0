//! Contract tests for the fallback chain.
//!
//! Covers ordering, health bookkeeping on every attempt, cache writes on
//! success only, and the exhausted-chain result.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use sportsfeed_providers::{
        Capability, DataRequest, FetchPayload, ProviderRegistry, SportsDataProvider,
    };

    use crate::aggregator::Aggregator;
    use crate::cache::RawDataCache;
    use crate::config::CacheTtls;
    use crate::health::ProviderHealthTracker;
    use crate::test_support::{Script, ScriptedProvider};

    struct Harness {
        aggregator: Aggregator,
        cache: Arc<RawDataCache>,
        health: Arc<ProviderHealthTracker>,
        registry: Arc<ProviderRegistry>,
    }

    fn harness(providers: Vec<Arc<ScriptedProvider>>) -> Harness {
        let registry = Arc::new(ProviderRegistry::new(
            providers
                .into_iter()
                .map(|p| p as Arc<dyn SportsDataProvider>)
                .collect(),
        ));
        let cache = Arc::new(RawDataCache::new());
        let health = Arc::new(ProviderHealthTracker::new(3600));
        let aggregator = Aggregator::new(
            registry.clone(),
            cache.clone(),
            health.clone(),
            CacheTtls::default(),
        );
        Harness {
            aggregator,
            cache,
            health,
            registry,
        }
    }

    fn cached_ids(cache: &RawDataCache, key: &str) -> Option<Vec<String>> {
        let payload: FetchPayload = cache.get_as(key)?;
        Some(
            payload
                .as_matches()?
                .iter()
                .map(|m| m.id.clone())
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider() {
        let a = ScriptedProvider::new("A", 1, Script::Fail("connection reset"));
        let b = ScriptedProvider::new("B", 2, Script::Items(vec!["1"]));
        let h = harness(vec![a.clone(), b.clone()]);

        let request = DataRequest::live("soccer");
        let outcome = h.aggregator.fetch(&request).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.provider_id.as_deref(), Some("B"));
        let matches = outcome.payload.as_matches().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "1");
        assert_eq!(matches[0].provider_id, "B");

        let health_a = h.health.get("A", Capability::Live).unwrap();
        let health_b = h.health.get("B", Capability::Live).unwrap();
        assert!(!health_a.ok);
        assert!(health_a.message.unwrap().contains("connection reset"));
        assert!(health_b.ok);

        assert_eq!(cached_ids(&h.cache, "live:soccer"), Some(vec!["1".to_string()]));
        assert_eq!(outcome.diagnostics.attempts.len(), 2);
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let a = ScriptedProvider::new("A", 1, Script::Items(vec!["1", "2"]));
        let b = ScriptedProvider::new("B", 2, Script::Items(vec!["3"]));
        let h = harness(vec![a.clone(), b.clone()]);

        let outcome = h.aggregator.fetch(&DataRequest::fixtures("39")).await.unwrap();

        assert_eq!(outcome.provider_id.as_deref(), Some("A"));
        assert_eq!(outcome.item_count(), 2);
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 0);
        assert!(h.health.get("B", Capability::Fixtures).is_none());
    }

    #[tokio::test]
    async fn test_fetch_from_skips_other_providers() {
        let a = ScriptedProvider::new("A", 1, Script::Items(vec!["1"]));
        let b = ScriptedProvider::new("B", 2, Script::Items(vec!["2"]));
        let h = harness(vec![a.clone(), b.clone()]);

        let outcome = h
            .aggregator
            .fetch_from(&DataRequest::live("soccer"), Some("b"))
            .await
            .unwrap();

        assert_eq!(outcome.provider_id.as_deref(), Some("B"));
        assert_eq!(a.calls(), 0);
        assert_eq!(b.calls(), 1);

        let outcome = h
            .aggregator
            .fetch_from(&DataRequest::live("soccer"), Some("NOPE"))
            .await
            .unwrap();
        assert!(!outcome.is_success());
        assert_eq!(a.calls(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_chain_leaves_cache_untouched() {
        let a = ScriptedProvider::new("A", 1, Script::Fail("500"));
        let b = ScriptedProvider::new("B", 2, Script::Empty);
        let h = harness(vec![a.clone(), b.clone()]);

        let previous = json!({"kind": "matches", "items": []});
        h.cache.set("fixtures:39", previous.clone(), 300);

        let outcome = h.aggregator.fetch(&DataRequest::fixtures("39")).await.unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.payload.is_empty());
        assert!(outcome.payload.as_matches().is_some());
        assert!(!outcome.confirmed_empty);
        assert_eq!(h.cache.get("fixtures:39"), Some(previous));

        assert!(!h.health.get("A", Capability::Fixtures).unwrap().ok);
        assert!(!h.health.get("B", Capability::Fixtures).unwrap().ok);
    }

    #[tokio::test]
    async fn test_exhausted_chain_does_not_create_entry() {
        let a = ScriptedProvider::new("A", 1, Script::RateLimited);
        let h = harness(vec![a]);

        let outcome = h.aggregator.fetch(&DataRequest::standings("39")).await.unwrap();

        assert!(!outcome.is_success());
        assert!(h.cache.is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_empty_is_healthy_but_not_cached() {
        let a = ScriptedProvider::new("A", 1, Script::ConfirmedEmpty);
        let b = ScriptedProvider::new("B", 2, Script::Fail("down"));
        let h = harness(vec![a.clone(), b.clone()]);

        let outcome = h.aggregator.fetch(&DataRequest::standings("39")).await.unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.confirmed_empty);
        assert_eq!(b.calls(), 1);
        assert!(h.health.get("A", Capability::Standings).unwrap().ok);
        assert!(h.cache.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_provider_is_skipped() {
        let a = ScriptedProvider::new("A", 1, Script::Items(vec!["1"]));
        let b = ScriptedProvider::new("B", 2, Script::Items(vec!["2"]));
        let h = harness(vec![a.clone(), b.clone()]);

        h.registry.set_enabled("A", Capability::Live, false).unwrap();
        let outcome = h.aggregator.fetch(&DataRequest::live("soccer")).await.unwrap();

        assert_eq!(outcome.provider_id.as_deref(), Some("B"));
        assert_eq!(a.calls(), 0);

        // Re-enabling takes effect on the very next call
        h.registry.set_enabled("A", Capability::Live, true).unwrap();
        let outcome = h.aggregator.fetch(&DataRequest::live("soccer")).await.unwrap();
        assert_eq!(outcome.provider_id.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_priority_change_applies_immediately() {
        let a = ScriptedProvider::new("A", 1, Script::Items(vec!["1"]));
        let b = ScriptedProvider::new("B", 2, Script::Items(vec!["2"]));
        let h = harness(vec![a, b]);

        h.registry.set_priority("B", Capability::Odds, 0).unwrap();
        let outcome = h.aggregator.fetch(&DataRequest::odds("99")).await.unwrap();

        assert_eq!(outcome.provider_id.as_deref(), Some("B"));
        let odds = outcome.payload.as_odds().unwrap();
        assert_eq!(odds[0].match_id, "99");
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_any_provider() {
        let a = ScriptedProvider::new("A", 1, Script::Items(vec!["1"]));
        let h = harness(vec![a.clone()]);

        let err = h.aggregator.fetch(&DataRequest::fixtures("  ")).await.unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(a.calls(), 0);
        assert!(h.health.get_all().is_empty());
    }

    #[tokio::test]
    async fn test_no_providers_returns_empty() {
        let h = harness(vec![]);
        let outcome = h.aggregator.fetch(&DataRequest::live("soccer")).await.unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.diagnostics.attempts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_provider_fails_over_and_never_writes() {
        let a = ScriptedProvider::new("A", 1, Script::Hang);
        let b = ScriptedProvider::new("B", 2, Script::Items(vec!["7"]));
        let h = harness(vec![a.clone(), b.clone()]);

        let outcome = h.aggregator.fetch(&DataRequest::live("soccer")).await.unwrap();

        assert_eq!(outcome.provider_id.as_deref(), Some("B"));
        let health_a = h.health.get("A", Capability::Live).unwrap();
        assert!(!health_a.ok);
        assert!(health_a.message.unwrap().contains("Timeout"));

        // Give the abandoned call every chance to finish; it was dropped.
        tokio::time::sleep(std::time::Duration::from_secs(7200)).await;
        assert_eq!(cached_ids(&h.cache, "live:soccer"), Some(vec!["7".to_string()]));
        assert!(!h.health.get("A", Capability::Live).unwrap().ok);
    }
}
