//! Watched queries.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use sportsfeed_providers::{Capability, DataRequest, SportsDataError};

/// A request the scheduler refreshes on every tick.
///
/// Serialized as its cache key (`live:soccer`, `fixtures:39`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WatchedQuery {
    request: DataRequest,
}

impl WatchedQuery {
    pub fn new(request: DataRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &DataRequest {
        &self.request
    }

    pub fn data_type(&self) -> Capability {
        self.request.capability()
    }

    /// Backoff and status key; identical to the request's cache key.
    pub fn key(&self) -> String {
        self.request.cache_key()
    }
}

impl From<DataRequest> for WatchedQuery {
    fn from(request: DataRequest) -> Self {
        Self::new(request)
    }
}

impl TryFrom<String> for WatchedQuery {
    type Error = SportsDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse::<DataRequest>().map(Self::new)
    }
}

impl From<WatchedQuery> for String {
    fn from(query: WatchedQuery) -> Self {
        query.key()
    }
}

impl fmt::Display for WatchedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Parse a comma separated list such as `live:soccer,fixtures:39`.
///
/// Malformed entries are skipped with a warning. Entries that share a cache
/// key with an earlier one are dropped.
pub fn parse_watched_list(raw: &str) -> Vec<WatchedQuery> {
    let parsed = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter_map(|part| match part.parse::<DataRequest>() {
            Ok(request) => Some(WatchedQuery::new(request)),
            Err(e) => {
                warn!("Ignoring watched query '{}': {}", part, e);
                None
            }
        })
        .collect();
    dedup_by_key(parsed)
}

/// Drop queries whose key repeats an earlier one, keeping order.
pub fn dedup_by_key(queries: Vec<WatchedQuery>) -> Vec<WatchedQuery> {
    let mut seen = std::collections::HashSet::new();
    queries
        .into_iter()
        .filter(|q| {
            let fresh = seen.insert(q.key());
            if !fresh {
                warn!("Dropping duplicate watched query '{}'", q);
            }
            fresh
        })
        .collect()
}
