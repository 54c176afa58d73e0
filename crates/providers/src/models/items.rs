//! Normalized result schema.
//!
//! Every adapter maps its payload into these types. Fields a source does not
//! supply stay `None` and serialize as explicit `null`, so downstream shape is
//! stable regardless of which adapter answered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized match state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Halftime,
    Finished,
    Postponed,
    Cancelled,
    #[default]
    Unknown,
}

impl MatchStatus {
    /// Map the short status codes used by most football feeds
    /// (`NS`, `1H`, `HT`, `FT`, ...) onto the normalized enum.
    pub fn from_short_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "NS" | "TBD" | "NOT STARTED" => Self::Scheduled,
            "1H" | "2H" | "ET" | "BT" | "P" | "LIVE" | "INT" => Self::Live,
            "HT" => Self::Halftime,
            "FT" | "AET" | "PEN" | "MATCH FINISHED" => Self::Finished,
            "PST" | "SUSP" | "POSTPONED" => Self::Postponed,
            "CANC" | "ABD" | "AWD" | "WO" | "CANCELLED" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    pub fn is_in_play(&self) -> bool {
        matches!(self, Self::Live | Self::Halftime)
    }
}

/// A fixture or in-play match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchItem {
    pub id: String,
    pub home: String,
    pub away: String,
    pub score_home: Option<i32>,
    pub score_away: Option<i32>,
    pub status: MatchStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub league_id: Option<String>,
    pub provider_id: String,
}

/// Match-winner prices from one bookmaker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsItem {
    pub match_id: String,
    pub bookmaker: String,
    pub market: String,
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub provider_id: String,
}

/// One row of a league table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub league_id: String,
    pub position: u32,
    pub team: String,
    pub played: Option<u32>,
    pub won: Option<u32>,
    pub drawn: Option<u32>,
    pub lost: Option<u32>,
    pub goal_difference: Option<i32>,
    pub points: Option<i32>,
    pub provider_id: String,
}
