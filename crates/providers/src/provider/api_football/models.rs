//! API-Football v3 response structures.

use serde::Deserialize;

/// Common envelope: `{ "errors": ..., "results": n, "response": [...] }`.
///
/// `errors` is an empty array on success and an object keyed by error kind
/// otherwise, so it is kept as raw JSON.
#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    #[serde(default)]
    pub errors: serde_json::Value,
    #[serde(default)]
    pub results: u32,
    #[serde(default = "Vec::new")]
    pub response: Vec<T>,
}

impl<T> Envelope<T> {
    /// Error messages reported by the API, if any.
    pub fn error_messages(&self) -> Vec<String> {
        match &self.errors {
            serde_json::Value::Object(map) => map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v.as_str().unwrap_or_default()))
                .collect(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FixtureEntry {
    pub fixture: Fixture,
    pub league: LeagueRef,
    pub teams: Teams,
    pub goals: Goals,
}

#[derive(Debug, Deserialize)]
pub(super) struct Fixture {
    pub id: i64,
    pub date: Option<String>,
    pub status: FixtureStatus,
}

#[derive(Debug, Deserialize)]
pub(super) struct FixtureStatus {
    pub short: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LeagueRef {
    pub id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Teams {
    pub home: Team,
    pub away: Team,
}

#[derive(Debug, Deserialize)]
pub(super) struct Team {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Goals {
    pub home: Option<i32>,
    pub away: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OddsEntry {
    pub fixture: OddsFixture,
    pub update: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OddsFixture {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct Bookmaker {
    pub name: String,
    #[serde(default)]
    pub bets: Vec<Bet>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Bet {
    pub name: String,
    #[serde(default)]
    pub values: Vec<BetValue>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BetValue {
    pub value: String,
    pub odd: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct StandingsEntry {
    pub league: StandingsLeague,
}

#[derive(Debug, Deserialize)]
pub(super) struct StandingsLeague {
    pub id: i64,
    /// One table per group; single-table leagues have exactly one.
    #[serde(default)]
    pub standings: Vec<Vec<StandingEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StandingEntry {
    pub rank: u32,
    pub team: Team,
    pub points: Option<i32>,
    pub goals_diff: Option<i32>,
    pub all: Option<Record>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Record {
    pub played: Option<u32>,
    pub win: Option<u32>,
    pub draw: Option<u32>,
    pub lose: Option<u32>,
}
