//! Prefetch event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sportsfeed_providers::Capability;

pub const TOPIC_UPDATES: &str = "prefetch.updates";
pub const TOPIC_ERROR: &str = "prefetch.error";

/// A watched query was refreshed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefetchUpdate {
    pub data_type: Capability,
    /// Cache key of the query, e.g. `fixtures:39`.
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub item_count: usize,
}

/// A watched query could not be refreshed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefetchFailure {
    pub data_type: Capability,
    pub query: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds until the query is eligible again.
    pub retry_in_secs: u64,
}

/// Event published by the prefetch scheduler, tagged with its topic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic")]
pub enum PrefetchEvent {
    #[serde(rename = "prefetch.updates")]
    Updated(PrefetchUpdate),
    #[serde(rename = "prefetch.error")]
    Failed(PrefetchFailure),
}

impl PrefetchEvent {
    pub fn updated(data_type: Capability, query: String, item_count: usize) -> Self {
        Self::Updated(PrefetchUpdate {
            data_type,
            query,
            timestamp: Utc::now(),
            item_count,
        })
    }

    pub fn failed(data_type: Capability, query: String, message: String, retry_in_secs: u64) -> Self {
        Self::Failed(PrefetchFailure {
            data_type,
            query,
            message,
            timestamp: Utc::now(),
            retry_in_secs,
        })
    }

    pub fn topic(&self) -> &'static str {
        match self {
            Self::Updated(_) => TOPIC_UPDATES,
            Self::Failed(_) => TOPIC_ERROR,
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Updated(update) => &update.query,
            Self::Failed(failure) => &failure.query,
        }
    }
}
