//! TheSportsDB response structures.
//!
//! Numeric fields arrive as strings (or `null`), so everything is decoded as
//! `Option<String>` and parsed during mapping.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct EventsResponse {
    pub events: Option<Vec<Event>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LivescoreResponse {
    pub livescore: Option<Vec<Event>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Event {
    pub id_event: String,
    pub id_league: Option<String>,
    pub str_home_team: Option<String>,
    pub str_away_team: Option<String>,
    pub int_home_score: Option<String>,
    pub int_away_score: Option<String>,
    pub str_status: Option<String>,
    pub str_timestamp: Option<String>,
    pub date_event: Option<String>,
    pub str_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TableResponse {
    pub table: Option<Vec<TableRow>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TableRow {
    pub int_rank: Option<String>,
    pub id_league: Option<String>,
    pub str_team: Option<String>,
    pub int_played: Option<String>,
    pub int_win: Option<String>,
    pub int_draw: Option<String>,
    pub int_loss: Option<String>,
    pub int_goal_difference: Option<String>,
    pub int_points: Option<String>,
}
