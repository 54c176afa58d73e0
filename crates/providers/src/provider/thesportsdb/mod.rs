//! TheSportsDB provider implementation.
//!
//! Free v1 endpoints cover fixtures (`eventsnextleague.php`) and league
//! tables (`lookuptable.php`). Live scores use the v2 `livescore` endpoint,
//! which only answers for premium keys. Odds are not offered at all.
//!
//! League ids are TheSportsDB's own; the registry translates canonical ids
//! before calling in here.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::errors::SportsDataError;
use crate::models::{Capability, MatchItem, MatchStatus, StandingRow};
use crate::provider::{ProviderCapabilities, SportsDataProvider};
use crate::resolver::IdScheme;

use models::{Event, EventsResponse, LivescoreResponse, TableResponse, TableRow};

const BASE_URL: &str = "https://www.thesportsdb.com/api";
pub const PROVIDER_ID: &str = "THESPORTSDB";

/// Public test key for the v1 API.
pub const FREE_API_KEY: &str = "123";

/// TheSportsDB provider.
pub struct TheSportsDbProvider {
    client: Client,
    api_key: String,
    premium: bool,
    base_url: String,
}

impl TheSportsDbProvider {
    /// Create a provider. Passing `None` uses the free test key, which
    /// disables live scores.
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        let (api_key, premium) = match api_key {
            Some(key) if !key.trim().is_empty() && key != FREE_API_KEY => (key, true),
            _ => (FREE_API_KEY.to_string(), false),
        };

        Self {
            client,
            api_key,
            premium,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_premium(&self) -> bool {
        self.premium
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: String,
        params: &[(&str, &str)],
        v2_auth: bool,
    ) -> Result<T, SportsDataError> {
        debug!("TheSportsDB request: {} {:?}", url, params);

        let mut request = self.client.get(&url).query(params);
        if v2_auth {
            request = request.header("X-API-KEY", &self.api_key);
        }

        let response = request.send().await.map_err(|e| SportsDataError::from_send(PROVIDER_ID, e))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SportsDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            return Err(SportsDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let text = response.text().await.map_err(|e| SportsDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to read response: {}", e),
        })?;

        serde_json::from_str(&text).map_err(|e| SportsDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse response: {}", e),
        })
    }
}

#[async_trait]
impl SportsDataProvider for TheSportsDbProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> i32 {
        2
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            capabilities: &[Capability::Live, Capability::Fixtures, Capability::Standings],
            sports: &[],
            timeout: None,
        }
    }

    /// League ids differ from API-Football's (Premier League is 4328, not 39).
    fn id_scheme(&self) -> IdScheme {
        IdScheme::Mapped
    }

    async fn fetch_live(&self, sport: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        if !self.premium {
            return Err(SportsDataError::not_supported(
                "live scores (premium key required)",
                PROVIDER_ID,
            ));
        }

        let url = format!("{}/v2/json/livescore/{}", self.base_url, v2_sport(sport));
        let response: LivescoreResponse = self.fetch(url, &[], true).await?;

        Ok(response
            .livescore
            .unwrap_or_default()
            .into_iter()
            .map(map_event)
            .collect())
    }

    async fn fetch_fixtures(&self, league_id: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        let url = format!(
            "{}/v1/json/{}/eventsnextleague.php",
            self.base_url, self.api_key
        );
        let response: EventsResponse = self.fetch(url, &[("id", league_id)], false).await?;

        Ok(response
            .events
            .unwrap_or_default()
            .into_iter()
            .map(map_event)
            .collect())
    }

    async fn fetch_standings(&self, league_id: &str) -> Result<Vec<StandingRow>, SportsDataError> {
        let url = format!("{}/v1/json/{}/lookuptable.php", self.base_url, self.api_key);
        let season = season_label(Utc::now());
        let response: TableResponse = self
            .fetch(url, &[("l", league_id), ("s", season.as_str())], false)
            .await?;

        Ok(response
            .table
            .unwrap_or_default()
            .into_iter()
            .filter_map(|row| map_table_row(row, league_id))
            .collect())
    }
}

/// TheSportsDB names football "Soccer".
fn v2_sport(sport: &str) -> String {
    match sport.to_ascii_lowercase().as_str() {
        "football" | "soccer" => "soccer".to_string(),
        other => other.to_string(),
    }
}

fn map_event(event: Event) -> MatchItem {
    let start_time = event
        .str_timestamp
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| {
            let date = NaiveDate::parse_from_str(event.date_event.as_deref()?, "%Y-%m-%d").ok()?;
            let time = event
                .str_time
                .as_deref()
                .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").ok())
                .unwrap_or_default();
            Some(NaiveDateTime::new(date, time).and_utc())
        });

    MatchItem {
        id: event.id_event,
        home: event.str_home_team.unwrap_or_default(),
        away: event.str_away_team.unwrap_or_default(),
        score_home: parse_num(event.int_home_score.as_deref()),
        score_away: parse_num(event.int_away_score.as_deref()),
        status: event
            .str_status
            .as_deref()
            .map(MatchStatus::from_short_code)
            .unwrap_or(MatchStatus::Scheduled),
        start_time,
        league_id: event.id_league,
        provider_id: PROVIDER_ID.to_string(),
    }
}

fn map_table_row(row: TableRow, league_id: &str) -> Option<StandingRow> {
    Some(StandingRow {
        league_id: row.id_league.unwrap_or_else(|| league_id.to_string()),
        position: parse_num(row.int_rank.as_deref())?,
        team: row.str_team.unwrap_or_default(),
        played: parse_num(row.int_played.as_deref()),
        won: parse_num(row.int_win.as_deref()),
        drawn: parse_num(row.int_draw.as_deref()),
        lost: parse_num(row.int_loss.as_deref()),
        goal_difference: parse_num(row.int_goal_difference.as_deref()),
        points: parse_num(row.int_points.as_deref()),
        provider_id: PROVIDER_ID.to_string(),
    })
}

fn parse_num<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Timestamps come without an offset and are UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

/// Season label in the `2025-2026` form used by `lookuptable.php`.
fn season_label(now: DateTime<Utc>) -> String {
    let start = if now.month() >= 7 {
        now.year()
    } else {
        now.year() - 1
    };
    format!("{}-{}", start, start + 1)
}
