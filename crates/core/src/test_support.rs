//! Scripted provider shared by the engine's tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sportsfeed_providers::{
    Capability, MatchItem, MatchStatus, OddsItem, ProviderCapabilities, SportsDataError,
    SportsDataProvider, StandingRow,
};
use tokio::sync::Semaphore;

#[derive(Clone, Debug)]
pub enum Script {
    /// Return matches with these ids.
    Items(Vec<&'static str>),
    Empty,
    ConfirmedEmpty,
    Fail(&'static str),
    RateLimited,
    /// Sleep far past any timeout.
    Hang,
}

pub struct ScriptedProvider {
    id: &'static str,
    priority: i32,
    script: Mutex<Script>,
    pub call_count: AtomicUsize,
    /// When set, every call waits for a permit before answering.
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedProvider {
    pub fn new(id: &'static str, priority: i32, script: Script) -> Arc<Self> {
        Arc::new(Self {
            id,
            priority,
            script: Mutex::new(script),
            call_count: AtomicUsize::new(0),
            gate: None,
        })
    }

    pub fn gated(id: &'static str, script: Script, gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            id,
            priority: 1,
            script: Mutex::new(script),
            call_count: AtomicUsize::new(0),
            gate: Some(gate),
        })
    }

    pub fn set_script(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    async fn run(&self) -> Result<Vec<&'static str>, SportsDataError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }
        let script = self.script.lock().unwrap().clone();
        match script {
            Script::Items(ids) => Ok(ids),
            Script::Empty => Ok(vec![]),
            Script::ConfirmedEmpty => Err(SportsDataError::ConfirmedEmpty {
                provider: self.id.to_string(),
                reason: "off-season".to_string(),
            }),
            Script::Fail(message) => Err(SportsDataError::ProviderError {
                provider: self.id.to_string(),
                message: message.to_string(),
            }),
            Script::RateLimited => Err(SportsDataError::RateLimited {
                provider: self.id.to_string(),
            }),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(vec!["late"])
            }
        }
    }
}

pub fn match_item(id: &str) -> MatchItem {
    MatchItem {
        id: id.to_string(),
        home: "Arsenal".to_string(),
        away: "Chelsea".to_string(),
        score_home: Some(1),
        score_away: Some(0),
        status: MatchStatus::Live,
        start_time: None,
        league_id: Some("39".to_string()),
        provider_id: String::new(),
    }
}

#[async_trait]
impl SportsDataProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            capabilities: &Capability::ALL,
            sports: &[],
            timeout: Some(Duration::from_secs(5)),
        }
    }

    async fn fetch_live(&self, _sport: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        Ok(self.run().await?.into_iter().map(match_item).collect())
    }

    async fn fetch_fixtures(&self, _league_id: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        Ok(self.run().await?.into_iter().map(match_item).collect())
    }

    async fn fetch_odds(&self, match_id: &str) -> Result<Vec<OddsItem>, SportsDataError> {
        Ok(self
            .run()
            .await?
            .into_iter()
            .map(|bookmaker| OddsItem {
                match_id: match_id.to_string(),
                bookmaker: bookmaker.to_string(),
                market: "match_winner".to_string(),
                home: Some(1.8),
                draw: Some(3.5),
                away: Some(4.0),
                updated_at: None,
                provider_id: String::new(),
            })
            .collect())
    }

    async fn fetch_standings(&self, league_id: &str) -> Result<Vec<StandingRow>, SportsDataError> {
        Ok(self
            .run()
            .await?
            .into_iter()
            .enumerate()
            .map(|(i, team)| StandingRow {
                league_id: league_id.to_string(),
                position: i as u32 + 1,
                team: team.to_string(),
                played: None,
                won: None,
                drawn: None,
                lost: None,
                goal_difference: None,
                points: None,
                provider_id: String::new(),
            })
            .collect())
    }
}
