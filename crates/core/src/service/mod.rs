//! Read surface over the cache.
//!
//! Everything here reads or maintains the cache; the only write path is
//! [`SportsDataService::resolve`], which goes through the aggregator on a
//! miss.

mod model;


pub use model::{DataSummary, MatchDetail, ResolvedData};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use sportsfeed_providers::{
    Capability, DataRequest, FetchPayload, MatchItem, OddsItem, StandingRow,
};

use crate::aggregator::Aggregator;
use crate::cache::{CacheExport, RawDataCache};
use crate::errors::Result;
use crate::prefetch::PrefetchScheduler;

pub struct SportsDataService {
    cache: Arc<RawDataCache>,
    aggregator: Arc<Aggregator>,
    scheduler: Arc<PrefetchScheduler>,
}

impl SportsDataService {
    pub fn new(
        cache: Arc<RawDataCache>,
        aggregator: Arc<Aggregator>,
        scheduler: Arc<PrefetchScheduler>,
    ) -> Self {
        Self {
            cache,
            aggregator,
            scheduler,
        }
    }

    fn cached_payload(&self, request: &DataRequest) -> Option<FetchPayload> {
        self.cache.get_as(&request.cache_key())
    }

    fn cached_for(&self, request: &DataRequest, source: Option<&str>) -> Result<Option<FetchPayload>> {
        request.validate()?;
        Ok(self.cached_payload(request).map(|mut payload| {
            if let Some(source) = source {
                payload.retain_provider(source);
            }
            payload
        }))
    }

    /// Cached in-play matches for a sport. A miss is an empty list.
    pub fn get_live_matches(&self, sport: &str, source: Option<&str>) -> Result<Vec<MatchItem>> {
        let payload = self.cached_for(&DataRequest::live(sport), source)?;
        Ok(payload
            .and_then(|p| p.as_matches().map(<[MatchItem]>::to_vec))
            .unwrap_or_default())
    }

    pub fn get_fixtures(&self, league_id: &str, source: Option<&str>) -> Result<Vec<MatchItem>> {
        let payload = self.cached_for(&DataRequest::fixtures(league_id), source)?;
        Ok(payload
            .and_then(|p| p.as_matches().map(<[MatchItem]>::to_vec))
            .unwrap_or_default())
    }

    pub fn get_odds(&self, match_id: &str, source: Option<&str>) -> Result<Vec<OddsItem>> {
        let payload = self.cached_for(&DataRequest::odds(match_id), source)?;
        Ok(payload
            .and_then(|p| p.as_odds().map(<[OddsItem]>::to_vec))
            .unwrap_or_default())
    }

    pub fn get_standings(&self, league_id: &str, source: Option<&str>) -> Result<Vec<StandingRow>> {
        let payload = self.cached_for(&DataRequest::standings(league_id), source)?;
        Ok(payload
            .and_then(|p| p.as_standings().map(<[StandingRow]>::to_vec))
            .unwrap_or_default())
    }

    /// Find a match in the cached live and fixture lists, live first, and
    /// attach any cached odds for it.
    pub fn get_match_detail(&self, match_id: &str, source: Option<&str>) -> Result<Option<MatchDetail>> {
        DataRequest::odds(match_id).validate()?;

        let found = [Capability::Live, Capability::Fixtures]
            .iter()
            .flat_map(|cap| self.cache.entries_with_prefix(&format!("{}:", cap)))
            .filter_map(|(key, value)| match serde_json::from_value::<FetchPayload>(value) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    warn!("Skipping undecodable cache entry '{}': {}", key, e);
                    None
                }
            })
            .find_map(|payload| {
                payload.as_matches().and_then(|items| {
                    items
                        .iter()
                        .find(|m| {
                            m.id == match_id
                                && source.map_or(true, |s| m.provider_id.eq_ignore_ascii_case(s))
                        })
                        .cloned()
                })
            });

        let Some(item) = found else {
            debug!("Match '{}' not in cache", match_id);
            return Ok(None);
        };

        let odds = self.get_odds(match_id, source)?;
        Ok(Some(MatchDetail { item, odds }))
    }

    /// Entry counts per capability, cache size and per-query prefetch status.
    pub fn get_data_summary(&self) -> DataSummary {
        let export = self.cache.export_all();
        let mut entries_by_capability: BTreeMap<String, usize> = Capability::ALL
            .iter()
            .map(|cap| (cap.to_string(), 0))
            .collect();

        for entry in export.entries.iter().filter(|e| e.ttl_remaining_seconds > 0) {
            if let Some((prefix, _)) = entry.key.split_once(':') {
                *entries_by_capability.entry(prefix.to_string()).or_default() += 1;
            }
        }

        DataSummary {
            generated_at: Utc::now(),
            total_entries: export.entries.len(),
            total_size_bytes: export.total_size,
            entries_by_capability,
            queries: self.scheduler.query_statuses(),
            last_tick: self.scheduler.last_report(),
        }
    }

    pub fn export_all(&self) -> CacheExport {
        self.cache.export_all()
    }

    pub fn cleanup(&self) -> usize {
        self.cache.cleanup()
    }

    /// Cache first, then a direct fetch through the aggregator on a miss.
    ///
    /// With `source` set, a cached entry holding nothing from that provider
    /// counts as a miss and only that provider is asked.
    pub async fn resolve(&self, request: &DataRequest, source: Option<&str>) -> Result<ResolvedData> {
        match self.cached_for(request, source)? {
            Some(payload) if !payload.is_empty() => Ok(ResolvedData {
                request: request.clone(),
                payload,
                from_cache: true,
                provider_id: None,
                diagnostics: None,
            }),
            _ => self.refresh(request, source).await,
        }
    }

    /// Fetch through the aggregator regardless of what is cached. A
    /// successful answer replaces the cache entry.
    pub async fn refresh(&self, request: &DataRequest, source: Option<&str>) -> Result<ResolvedData> {
        let outcome = self.aggregator.fetch_from(request, source).await?;

        Ok(ResolvedData {
            request: request.clone(),
            payload: outcome.payload,
            from_cache: false,
            provider_id: outcome.provider_id,
            diagnostics: Some(outcome.diagnostics),
        })
    }
}
