//! Provider health tracker.
//!
//! Keeps the last outcome of every `(provider, capability)` pair. This is
//! observability only: nothing here can fail the fetch path, and stale
//! records are filtered on read rather than deleted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::Serialize;
use sportsfeed_providers::Capability;

/// Last observed outcome for one provider and capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealthRecord {
    pub provider_id: String,
    pub capability: Capability,
    pub ok: bool,
    pub message: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl ProviderHealthRecord {
    pub fn is_stale_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.observed_at > window
    }
}

/// A record plus its staleness, as shown on diagnostics pages.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthView {
    #[serde(flatten)]
    pub record: ProviderHealthRecord,
    pub stale: bool,
}

type HealthKey = (String, Capability);

#[derive(Debug)]
pub struct ProviderHealthTracker {
    records: Mutex<HashMap<HealthKey, ProviderHealthRecord>>,
    stale_after: Duration,
}

impl ProviderHealthTracker {
    pub fn new(stale_after_secs: u64) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            stale_after: Duration::seconds(stale_after_secs.min(i32::MAX as u64) as i64),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<HealthKey, ProviderHealthRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| {
            warn!("Health tracker lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Overwrite the record for `(provider_id, capability)`.
    pub fn record_attempt(
        &self,
        provider_id: &str,
        capability: Capability,
        ok: bool,
        message: Option<String>,
    ) {
        self.record_attempt_at(provider_id, capability, ok, message, Utc::now());
    }

    pub fn record_attempt_at(
        &self,
        provider_id: &str,
        capability: Capability,
        ok: bool,
        message: Option<String>,
        now: DateTime<Utc>,
    ) {
        let record = ProviderHealthRecord {
            provider_id: provider_id.to_string(),
            capability,
            ok,
            message,
            observed_at: now,
        };
        self.lock()
            .insert((provider_id.to_string(), capability), record);
    }

    pub fn get(&self, provider_id: &str, capability: Capability) -> Option<ProviderHealthRecord> {
        self.lock()
            .get(&(provider_id.to_string(), capability))
            .cloned()
    }

    /// Every stored record, stale ones included, ordered by provider then
    /// capability.
    pub fn get_all(&self) -> Vec<ProviderHealthRecord> {
        let mut records: Vec<ProviderHealthRecord> = self.lock().values().cloned().collect();
        records.sort_by(|a, b| {
            a.provider_id
                .cmp(&b.provider_id)
                .then(a.capability.cmp(&b.capability))
        });
        records
    }

    /// Records observed within the staleness window.
    pub fn get_fresh(&self) -> Vec<ProviderHealthRecord> {
        self.get_fresh_at(Utc::now())
    }

    pub fn get_fresh_at(&self, now: DateTime<Utc>) -> Vec<ProviderHealthRecord> {
        self.get_all()
            .into_iter()
            .filter(|r| !r.is_stale_at(now, self.stale_after))
            .collect()
    }

    /// All records tagged with their staleness.
    pub fn views_at(&self, now: DateTime<Utc>) -> Vec<HealthView> {
        self.get_all()
            .into_iter()
            .map(|record| HealthView {
                stale: record.is_stale_at(now, self.stale_after),
                record,
            })
            .collect()
    }
}

impl Default for ProviderHealthTracker {
    fn default() -> Self {
        Self::new(3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_record_overwrites_pair() {
        let tracker = ProviderHealthTracker::new(3600);
        tracker.record_attempt_at("A", Capability::Live, false, Some("timeout".into()), t0());
        tracker.record_attempt_at("A", Capability::Live, true, None, t0() + Duration::seconds(5));
        tracker.record_attempt_at("A", Capability::Odds, false, None, t0());

        let records = tracker.get_all();
        assert_eq!(records.len(), 2);

        let live = tracker.get("A", Capability::Live).unwrap();
        assert!(live.ok);
        assert_eq!(live.message, None);
        assert_eq!(live.observed_at, t0() + Duration::seconds(5));
    }

    #[test]
    fn test_stale_records_are_filtered_not_deleted() {
        let tracker = ProviderHealthTracker::new(3600);
        tracker.record_attempt_at("A", Capability::Fixtures, true, None, t0());
        tracker.record_attempt_at("B", Capability::Fixtures, true, None, t0() + Duration::seconds(3000));

        let now = t0() + Duration::seconds(3700);
        let fresh = tracker.get_fresh_at(now);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].provider_id, "B");
        assert_eq!(tracker.get_all().len(), 2);

        let views = tracker.views_at(now);
        assert!(views[0].stale);
        assert!(!views[1].stale);
    }

    #[test]
    fn test_records_sorted() {
        let tracker = ProviderHealthTracker::default();
        tracker.record_attempt("B", Capability::Live, true, None);
        tracker.record_attempt("A", Capability::Standings, true, None);
        tracker.record_attempt("A", Capability::Live, true, None);

        let order: Vec<(String, Capability)> = tracker
            .get_all()
            .into_iter()
            .map(|r| (r.provider_id, r.capability))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A".to_string(), Capability::Live),
                ("A".to_string(), Capability::Standings),
                ("B".to_string(), Capability::Live),
            ]
        );
    }
}
