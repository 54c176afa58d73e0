//! API-Football (api-sports.io v3) provider implementation.
//!
//! This module provides soccer data from the API-Football service:
//! - Live matches via `/fixtures?live=all`
//! - Upcoming fixtures via `/fixtures?league=..&next=..`
//! - Match-winner odds via `/odds?fixture=..&bet=1`
//! - League tables via `/standings?league=..&season=..`
//!
//! API documentation: https://www.api-football.com/documentation-v3

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::errors::SportsDataError;
use crate::models::{Capability, MatchItem, MatchStatus, OddsItem, StandingRow};
use crate::provider::{ProviderCapabilities, SportsDataProvider};

use models::{Envelope, FixtureEntry, OddsEntry, StandingsEntry};

const BASE_URL: &str = "https://v3.football.api-sports.io";
pub const PROVIDER_ID: &str = "API_FOOTBALL";

/// Number of upcoming fixtures requested per league.
const NEXT_FIXTURES: &str = "20";

/// Bet id of the match-winner (1X2) market.
const MATCH_WINNER_BET: &str = "1";

/// API-Football provider.
///
/// Soccer only. The free plan allows 100 requests per day, which is why the
/// prefetch cadence and cache TTLs matter more than raw speed here.
pub struct ApiFootballProvider {
    client: Client,
    api_key: String,
    base_url: String,
    season: Option<i32>,
}

impl ApiFootballProvider {
    /// Create a new provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
            season: None,
        }
    }

    /// Point the provider at a different host (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Pin the season used for standings instead of deriving it from the date.
    pub fn with_season(mut self, season: i32) -> Self {
        self.season = Some(season);
        self
    }

    fn season(&self) -> i32 {
        self.season.unwrap_or_else(|| season_for(Utc::now()))
    }

    /// Make a GET request and decode the envelope.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Envelope<T>, SportsDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("API-Football request: {} {:?}", endpoint, params);

        let response = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| SportsDataError::from_send(PROVIDER_ID, e))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SportsDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SportsDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, truncate(&body, 200)),
            });
        }

        let text = response.text().await.map_err(|e| SportsDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to read response: {}", e),
        })?;

        parse_envelope(&text)
    }
}

#[async_trait]
impl SportsDataProvider for ApiFootballProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> i32 {
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            capabilities: &[
                Capability::Live,
                Capability::Fixtures,
                Capability::Odds,
                Capability::Standings,
            ],
            sports: &["soccer", "football"],
            timeout: None,
        }
    }

    async fn fetch_live(&self, sport: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        if !self.capabilities().covers_sport(sport) {
            return Err(SportsDataError::not_supported(
                &format!("live {}", sport),
                PROVIDER_ID,
            ));
        }

        let envelope: Envelope<FixtureEntry> = self.fetch("/fixtures", &[("live", "all")]).await?;

        // No in-play matches is a normal state, not an outage.
        if envelope.results == 0 && envelope.response.is_empty() {
            return Err(SportsDataError::ConfirmedEmpty {
                provider: PROVIDER_ID.to_string(),
                reason: "no matches in play".to_string(),
            });
        }

        Ok(envelope.response.into_iter().map(map_fixture).collect())
    }

    async fn fetch_fixtures(&self, league_id: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        let envelope: Envelope<FixtureEntry> = self
            .fetch("/fixtures", &[("league", league_id), ("next", NEXT_FIXTURES)])
            .await?;

        Ok(envelope.response.into_iter().map(map_fixture).collect())
    }

    async fn fetch_odds(&self, match_id: &str) -> Result<Vec<OddsItem>, SportsDataError> {
        let envelope: Envelope<OddsEntry> = self
            .fetch("/odds", &[("fixture", match_id), ("bet", MATCH_WINNER_BET)])
            .await?;

        Ok(envelope.response.into_iter().flat_map(map_odds).collect())
    }

    async fn fetch_standings(&self, league_id: &str) -> Result<Vec<StandingRow>, SportsDataError> {
        let season = self.season().to_string();
        let envelope: Envelope<StandingsEntry> = self
            .fetch(
                "/standings",
                &[("league", league_id), ("season", season.as_str())],
            )
            .await?;

        Ok(envelope
            .response
            .into_iter()
            .flat_map(map_standings)
            .collect())
    }
}

/// Decode an envelope and surface API-level errors.
///
/// API-Football reports quota and key problems with HTTP 200 and a non-empty
/// `errors` field.
fn parse_envelope<T: DeserializeOwned>(text: &str) -> Result<Envelope<T>, SportsDataError> {
    let envelope: Envelope<T> =
        serde_json::from_str(text).map_err(|e| SportsDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse response: {}", e),
        })?;

    let errors = envelope.error_messages();
    if !errors.is_empty() {
        let joined = errors.join("; ");
        let lower = joined.to_ascii_lowercase();
        if lower.contains("ratelimit") || lower.contains("requests") {
            return Err(SportsDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        return Err(SportsDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: joined,
        });
    }

    Ok(envelope)
}

fn map_fixture(entry: FixtureEntry) -> MatchItem {
    MatchItem {
        id: entry.fixture.id.to_string(),
        home: entry.teams.home.name.unwrap_or_default(),
        away: entry.teams.away.name.unwrap_or_default(),
        score_home: entry.goals.home,
        score_away: entry.goals.away,
        status: entry
            .fixture
            .status
            .short
            .as_deref()
            .map(MatchStatus::from_short_code)
            .unwrap_or_default(),
        start_time: entry.fixture.date.as_deref().and_then(parse_timestamp),
        league_id: entry.league.id.map(|id| id.to_string()),
        provider_id: PROVIDER_ID.to_string(),
    }
}

fn map_odds(entry: OddsEntry) -> Vec<OddsItem> {
    let match_id = entry.fixture.id.to_string();
    let updated_at = entry.update.as_deref().and_then(parse_timestamp);

    entry
        .bookmakers
        .into_iter()
        .filter_map(|bookmaker| {
            let bet = bookmaker
                .bets
                .into_iter()
                .find(|b| b.name.eq_ignore_ascii_case("Match Winner"))?;

            let price = |label: &str| {
                bet.values
                    .iter()
                    .find(|v| v.value.eq_ignore_ascii_case(label))
                    .and_then(|v| v.odd.parse::<f64>().ok())
            };

            Some(OddsItem {
                match_id: match_id.clone(),
                bookmaker: bookmaker.name,
                market: "match_winner".to_string(),
                home: price("Home"),
                draw: price("Draw"),
                away: price("Away"),
                updated_at,
                provider_id: PROVIDER_ID.to_string(),
            })
        })
        .collect()
}

fn map_standings(entry: StandingsEntry) -> Vec<StandingRow> {
    let league_id = entry.league.id.to_string();

    entry
        .league
        .standings
        .into_iter()
        .flatten()
        .map(|row| StandingRow {
            league_id: league_id.clone(),
            position: row.rank,
            team: row.team.name.unwrap_or_default(),
            played: row.all.as_ref().and_then(|r| r.played),
            won: row.all.as_ref().and_then(|r| r.win),
            drawn: row.all.as_ref().and_then(|r| r.draw),
            lost: row.all.as_ref().and_then(|r| r.lose),
            goal_difference: row.goals_diff,
            points: row.points,
            provider_id: PROVIDER_ID.to_string(),
        })
        .collect()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// European seasons are named after the year they start in (Aug-May).
fn season_for(now: DateTime<Utc>) -> i32 {
    if now.month() >= 7 {
        now.year()
    } else {
        now.year() - 1
    }
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
