use std::collections::HashMap;
use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use sportsfeed_core::prefetch::parse_watched_list;
use sportsfeed_core::{CacheTtls, EngineConfig};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub prefetch_enabled: bool,
    pub api_football_key: Option<String>,
    pub thesportsdb_key: Option<String>,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            prefetch_enabled: true,
            api_football_key: None,
            thesportsdb_key: None,
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let engine_defaults = EngineConfig::default();
        let ttl_defaults = CacheTtls::default();

        let listen_addr: SocketAddr = std::env::var("SF_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SF_LISTEN_ADDR")?;
        let cors_allow = std::env::var("SF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_number("SF_REQUEST_TIMEOUT_MS", 30_000);
        let prefetch_enabled = std::env::var("SF_PREFETCH_ENABLED")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(defaults.prefetch_enabled);

        let engine = EngineConfig {
            prefetch_interval_secs: env_number(
                "SF_PREFETCH_INTERVAL_SECS",
                engine_defaults.prefetch_interval_secs,
            ),
            backoff_base_secs: env_number("SF_BACKOFF_BASE_SECS", engine_defaults.backoff_base_secs),
            backoff_max_secs: env_number("SF_BACKOFF_MAX_SECS", engine_defaults.backoff_max_secs),
            ttls: CacheTtls {
                live_secs: env_number("SF_TTL_LIVE_SECS", ttl_defaults.live_secs),
                fixtures_secs: env_number("SF_TTL_FIXTURES_SECS", ttl_defaults.fixtures_secs),
                odds_secs: env_number("SF_TTL_ODDS_SECS", ttl_defaults.odds_secs),
                standings_secs: env_number("SF_TTL_STANDINGS_SECS", ttl_defaults.standings_secs),
            },
            provider_timeout_secs: env_number(
                "SF_PROVIDER_TIMEOUT_SECS",
                engine_defaults.provider_timeout_secs,
            ),
            provider_timeouts: std::env::var("SF_PROVIDER_TIMEOUTS")
                .map(|raw| parse_timeout_overrides(&raw))
                .unwrap_or_default(),
            health_stale_secs: env_number("SF_HEALTH_STALE_SECS", engine_defaults.health_stale_secs),
            event_capacity: env_number("SF_EVENT_CAPACITY", engine_defaults.event_capacity),
            watched: std::env::var("SF_WATCHED")
                .map(|raw| parse_watched_list(&raw))
                .unwrap_or_default(),
        };

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            prefetch_enabled,
            api_football_key: non_empty_var("SF_API_FOOTBALL_KEY"),
            thesportsdb_key: non_empty_var("SF_THESPORTSDB_KEY"),
            engine,
        })
    }
}

fn env_number<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring malformed {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses `ID=SECS` pairs such as `API_FOOTBALL=10,THESPORTSDB=6`.
fn parse_timeout_overrides(raw: &str) -> HashMap<String, u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter_map(|pair| {
            let parsed = pair
                .split_once('=')
                .and_then(|(id, secs)| Some((id.trim(), secs.trim().parse::<u64>().ok()?)))
                .filter(|(id, _)| !id.is_empty());
            if parsed.is_none() {
                tracing::warn!("Skipping malformed provider timeout {:?}", pair);
            }
            parsed.map(|(id, secs)| (id.to_ascii_uppercase(), secs))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_overrides() {
        let parsed = parse_timeout_overrides("api_football=10, THESPORTSDB = 6,broken,=4,X=abc");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("API_FOOTBALL"), Some(&10));
        assert_eq!(parsed.get("THESPORTSDB"), Some(&6));
    }

    #[test]
    fn test_env_number_falls_back_on_garbage() {
        std::env::set_var("SF_TEST_ENV_NUMBER", "sixty");
        assert_eq!(env_number("SF_TEST_ENV_NUMBER", 60u64), 60);
        std::env::set_var("SF_TEST_ENV_NUMBER", " 90 ");
        assert_eq!(env_number("SF_TEST_ENV_NUMBER", 60u64), 90);
        std::env::remove_var("SF_TEST_ENV_NUMBER");
        assert_eq!(env_number("SF_TEST_ENV_NUMBER", 60u64), 60);
    }
}
