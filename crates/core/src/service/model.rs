//! Read surface response types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sportsfeed_providers::{DataRequest, FetchDiagnostics, FetchPayload, MatchItem, OddsItem};

use crate::prefetch::{QueryStatus, TickReport};

/// A match with whatever odds are cached for it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub item: MatchItem,
    pub odds: Vec<OddsItem>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    pub generated_at: DateTime<Utc>,
    pub total_entries: usize,
    pub total_size_bytes: usize,
    /// Live (unexpired) entries per capability.
    pub entries_by_capability: BTreeMap<String, usize>,
    pub queries: Vec<QueryStatus>,
    pub last_tick: Option<TickReport>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedData {
    pub request: DataRequest,
    pub payload: FetchPayload,
    pub from_cache: bool,
    /// Provider that answered a live fetch.
    pub provider_id: Option<String>,
    pub diagnostics: Option<FetchDiagnostics>,
}
