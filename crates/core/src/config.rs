//! Engine configuration.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sportsfeed_providers::Capability;

use crate::prefetch::WatchedQuery;

/// Cache TTL per capability, in seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheTtls {
    pub live_secs: u64,
    pub fixtures_secs: u64,
    pub odds_secs: u64,
    pub standings_secs: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            live_secs: 30,
            fixtures_secs: 300,
            odds_secs: 300,
            standings_secs: 600,
        }
    }
}

impl CacheTtls {
    pub fn for_capability(&self, capability: Capability) -> u64 {
        match capability {
            Capability::Live => self.live_secs,
            Capability::Fixtures => self.fixtures_secs,
            Capability::Odds => self.odds_secs,
            Capability::Standings => self.standings_secs,
        }
    }
}

/// Configuration for [`EngineContext`](crate::EngineContext).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Seconds between prefetch ticks.
    pub prefetch_interval_secs: u64,
    pub backoff_base_secs: u64,
    pub backoff_max_secs: u64,
    pub ttls: CacheTtls,
    /// Default time budget for one adapter call.
    pub provider_timeout_secs: u64,
    /// Per-provider overrides, keyed by provider id.
    pub provider_timeouts: HashMap<String, u64>,
    /// Health records older than this are treated as absent.
    pub health_stale_secs: u64,
    /// Buffer size of the notification channel.
    pub event_capacity: usize,
    pub watched: Vec<WatchedQuery>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prefetch_interval_secs: 60,
            backoff_base_secs: 60,
            backoff_max_secs: 3600,
            ttls: CacheTtls::default(),
            provider_timeout_secs: 8,
            provider_timeouts: HashMap::new(),
            health_stale_secs: 3600,
            event_capacity: 256,
            watched: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn prefetch_interval(&self) -> Duration {
        Duration::from_secs(self.prefetch_interval_secs.max(1))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs.max(1))
    }

    pub fn provider_timeout_overrides(&self) -> HashMap<String, Duration> {
        self.provider_timeouts
            .iter()
            .map(|(id, secs)| (id.clone(), Duration::from_secs((*secs).max(1))))
            .collect()
    }
}
