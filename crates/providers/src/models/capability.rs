//! The four query kinds every adapter may serve.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SportsDataError;

/// One of the supported query kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Live,
    Fixtures,
    Odds,
    Standings,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Live,
        Capability::Fixtures,
        Capability::Odds,
        Capability::Standings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fixtures => "fixtures",
            Self::Odds => "odds",
            Self::Standings => "standings",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = SportsDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "fixtures" => Ok(Self::Fixtures),
            "odds" => Ok(Self::Odds),
            "standings" => Ok(Self::Standings),
            other => Err(SportsDataError::InvalidRequest(format!(
                "unknown capability '{}'",
                other
            ))),
        }
    }
}
