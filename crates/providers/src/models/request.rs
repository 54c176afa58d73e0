//! Typed data requests.
//!
//! A [`DataRequest`] pairs a capability with its single parameter. The cache
//! key is derived from it deterministically so every writer and reader of
//! the same query lands on the same entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Capability;
use crate::errors::SportsDataError;

/// A query against one capability.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "lowercase")]
pub enum DataRequest {
    Live {
        sport: String,
    },
    Fixtures {
        #[serde(rename = "leagueId")]
        league_id: String,
    },
    Odds {
        #[serde(rename = "matchId")]
        match_id: String,
    },
    Standings {
        #[serde(rename = "leagueId")]
        league_id: String,
    },
}

impl DataRequest {
    /// Sport codes are case-folded so `Soccer` and `soccer` compare equal.
    pub fn live(sport: impl Into<String>) -> Self {
        Self::Live {
            sport: sport.into().trim().to_ascii_lowercase(),
        }
    }

    pub fn fixtures(league_id: impl Into<String>) -> Self {
        Self::Fixtures {
            league_id: league_id.into(),
        }
    }

    pub fn odds(match_id: impl Into<String>) -> Self {
        Self::Odds {
            match_id: match_id.into(),
        }
    }

    pub fn standings(league_id: impl Into<String>) -> Self {
        Self::Standings {
            league_id: league_id.into(),
        }
    }

    /// Build a request from a capability and its parameter.
    pub fn new(capability: Capability, param: impl Into<String>) -> Self {
        match capability {
            Capability::Live => Self::live(param),
            Capability::Fixtures => Self::fixtures(param),
            Capability::Odds => Self::odds(param),
            Capability::Standings => Self::standings(param),
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            Self::Live { .. } => Capability::Live,
            Self::Fixtures { .. } => Capability::Fixtures,
            Self::Odds { .. } => Capability::Odds,
            Self::Standings { .. } => Capability::Standings,
        }
    }

    /// The sport code, league id or match id carried by the request.
    pub fn param(&self) -> &str {
        match self {
            Self::Live { sport } => sport,
            Self::Fixtures { league_id } | Self::Standings { league_id } => league_id,
            Self::Odds { match_id } => match_id,
        }
    }

    /// Cache key, e.g. `live:soccer` or `fixtures:39`.
    ///
    /// Also folds sports on requests that did not come through
    /// [`DataRequest::live`], such as deserialized ones.
    pub fn cache_key(&self) -> String {
        match self {
            Self::Live { sport } => format!("live:{}", sport.trim().to_ascii_lowercase()),
            _ => format!("{}:{}", self.capability(), self.param().trim()),
        }
    }

    /// Reject parameters that no adapter could meaningfully answer.
    pub fn validate(&self) -> Result<(), SportsDataError> {
        let param = self.param().trim();
        if param.is_empty() {
            return Err(SportsDataError::InvalidRequest(format!(
                "{} request requires a parameter",
                self.capability()
            )));
        }
        if param.contains(':') || param.chars().any(char::is_whitespace) {
            return Err(SportsDataError::InvalidRequest(format!(
                "invalid {} parameter '{}'",
                self.capability(),
                param
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DataRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

impl FromStr for DataRequest {
    type Err = SportsDataError;

    /// Parses `capability:param`, e.g. `standings:39`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (capability, param) = s.trim().split_once(':').ok_or_else(|| {
            SportsDataError::InvalidRequest(format!("expected 'capability:param', got '{}'", s))
        })?;
        let request = Self::new(capability.parse()?, param.trim());
        request.validate()?;
        Ok(request)
    }
}
