//! Per-query exponential backoff.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::Serialize;
use sportsfeed_providers::Capability;

use super::WatchedQuery;

/// Delay after `failures` consecutive failures:
/// `min(max, base * 2^(failures - 1))`, never below one second.
///
/// ```
/// use sportsfeed_core::prefetch::backoff_delay_secs;
///
/// assert_eq!(backoff_delay_secs(1, 60, 3600), 60);
/// assert_eq!(backoff_delay_secs(6, 60, 3600), 1920);
/// assert_eq!(backoff_delay_secs(7, 60, 3600), 3600);
/// ```
pub fn backoff_delay_secs(failures: u32, base_secs: u64, max_secs: u64) -> u64 {
    if failures == 0 {
        return 0;
    }
    let factor = 2u64.saturating_pow(failures - 1);
    base_secs.saturating_mul(factor).min(max_secs).max(1)
}

/// Backoff for one watched query. Only exists while failures are ongoing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackoffState {
    pub data_type: Capability,
    pub query: String,
    pub consecutive_failures: u32,
    pub next_allowed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Backoff states keyed by watched query.
#[derive(Debug)]
pub struct BackoffTable {
    states: Mutex<HashMap<String, BackoffState>>,
    base_secs: u64,
    max_secs: u64,
}

impl BackoffTable {
    pub fn new(base_secs: u64, max_secs: u64) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            base_secs,
            max_secs: max_secs.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, BackoffState>> {
        self.states.lock().unwrap_or_else(|poisoned| {
            warn!("Backoff table lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// False while `now` is before the query's `next_allowed_at`.
    pub fn is_allowed_at(&self, query: &WatchedQuery, now: DateTime<Utc>) -> bool {
        match self.lock().get(&query.key()) {
            Some(BackoffState {
                next_allowed_at: Some(next),
                ..
            }) => now >= *next,
            _ => true,
        }
    }

    /// Count a failure and push `next_allowed_at` out. Returns the delay in
    /// seconds.
    pub fn record_failure_at(&self, query: &WatchedQuery, message: &str, now: DateTime<Utc>) -> u64 {
        let mut states = self.lock();
        let state = states.entry(query.key()).or_insert_with(|| BackoffState {
            data_type: query.data_type(),
            query: query.key(),
            consecutive_failures: 0,
            next_allowed_at: None,
            last_error: None,
        });

        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        let delay = backoff_delay_secs(state.consecutive_failures, self.base_secs, self.max_secs);
        state.next_allowed_at = Some(now + Duration::seconds(delay.min(i32::MAX as u64) as i64));
        state.last_error = Some(message.to_string());
        delay
    }

    /// Clear the query's backoff entirely.
    pub fn record_success(&self, query: &WatchedQuery) {
        self.lock().remove(&query.key());
    }

    pub fn get(&self, query: &WatchedQuery) -> Option<BackoffState> {
        self.lock().get(&query.key()).cloned()
    }

    pub fn snapshot(&self) -> Vec<BackoffState> {
        let mut states: Vec<BackoffState> = self.lock().values().cloned().collect();
        states.sort_by(|a, b| a.query.cmp(&b.query));
        states
    }
}
