//! Raw data cache.
//!
//! A TTL key-value store. Reads apply expiry lazily, so an entry past its
//! deadline is a miss even before [`RawDataCache::cleanup`] removes it.
//! Each key is independent; concurrent writers to one key are
//! last-writer-wins.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Upper bound on a single entry's lifetime (one year).
const MAX_TTL_SECS: u64 = 365 * 24 * 3600;

/// A stored value with its lifetime.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub value: Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    size_bytes: usize,
}

impl CacheEntry {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Diagnostics row for one cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryInfo {
    pub key: String,
    pub approx_size_bytes: usize,
    pub age_seconds: i64,
    pub ttl_remaining_seconds: i64,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheExport {
    pub entries: Vec<CacheEntryInfo>,
    pub total_size: usize,
}

#[derive(Debug, Default)]
pub struct RawDataCache {
    entries: DashMap<String, CacheEntry>,
}

impl RawDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value.clone())
    }

    /// Read and decode a value. A value that no longer decodes is a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Cache entry '{}' could not be decoded: {}", key, e);
                None
            }
        }
    }

    /// Overwrite `key`. A zero TTL is raised to one second so an entry always
    /// expires after it was created.
    pub fn set(&self, key: &str, value: Value, ttl_secs: u64) {
        self.set_at(key, value, ttl_secs, Utc::now());
    }

    pub fn set_at(&self, key: &str, value: Value, ttl_secs: u64, now: DateTime<Utc>) {
        let ttl = Duration::seconds(ttl_secs.clamp(1, MAX_TTL_SECS) as i64);
        let size_bytes = approx_size(&value);
        let entry = CacheEntry {
            key: key.to_string(),
            value,
            created_at: now,
            expires_at: now + ttl,
            size_bytes,
        };
        self.entries.insert(key.to_string(), entry);
    }

    /// Delete every entry whose deadline has passed. Returns how many went.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Utc::now())
    }

    pub fn cleanup_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!("Cache cleanup removed {} expired entries", removed);
        }
        removed
    }

    /// Live entries whose key starts with `prefix`, sorted by key.
    pub fn entries_with_prefix(&self, prefix: &str) -> Vec<(String, Value)> {
        let now = Utc::now();
        let mut found: Vec<(String, Value)> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix) && !entry.is_expired_at(now))
            .map(|entry| (entry.key().clone(), entry.value.clone()))
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        found
    }

    pub fn export_all(&self) -> CacheExport {
        self.export_all_at(Utc::now())
    }

    /// Snapshot of every stored entry, expired-but-unswept ones included
    /// (with zero TTL remaining).
    pub fn export_all_at(&self, now: DateTime<Utc>) -> CacheExport {
        let mut entries: Vec<CacheEntryInfo> = self
            .entries
            .iter()
            .map(|entry| CacheEntryInfo {
                key: entry.key.clone(),
                approx_size_bytes: entry.size_bytes,
                age_seconds: (now - entry.created_at).num_seconds().max(0),
                ttl_remaining_seconds: (entry.expires_at - now).num_seconds().max(0),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        let total_size = entries.iter().map(|e| e.approx_size_bytes).sum();
        CacheExport {
            entries,
            total_size,
        }
    }

    /// Number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn approx_size(value: &Value) -> usize {
    serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
}
