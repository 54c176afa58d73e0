//! Capability-specific payload container.

use serde::{Deserialize, Serialize};

use super::{Capability, MatchItem, OddsItem, StandingRow};

/// The normalized result of one fetch.
///
/// Live and fixtures share the match schema; odds and standings have their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum FetchPayload {
    Matches(Vec<MatchItem>),
    Odds(Vec<OddsItem>),
    Standings(Vec<StandingRow>),
}

impl FetchPayload {
    /// The explicit "no data" value for a capability.
    pub fn empty_for(capability: Capability) -> Self {
        match capability {
            Capability::Live | Capability::Fixtures => Self::Matches(Vec::new()),
            Capability::Odds => Self::Odds(Vec::new()),
            Capability::Standings => Self::Standings(Vec::new()),
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            Self::Matches(items) => items.len(),
            Self::Odds(items) => items.len(),
            Self::Standings(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Overwrite the provider id on every item.
    pub fn stamp_provider(&mut self, provider_id: &str) {
        match self {
            Self::Matches(items) => items
                .iter_mut()
                .for_each(|i| i.provider_id = provider_id.to_string()),
            Self::Odds(items) => items
                .iter_mut()
                .for_each(|i| i.provider_id = provider_id.to_string()),
            Self::Standings(items) => items
                .iter_mut()
                .for_each(|i| i.provider_id = provider_id.to_string()),
        }
    }

    /// Keep only items whose provider id equals `provider_id`.
    pub fn retain_provider(&mut self, provider_id: &str) {
        match self {
            Self::Matches(items) => items.retain(|i| i.provider_id.eq_ignore_ascii_case(provider_id)),
            Self::Odds(items) => items.retain(|i| i.provider_id.eq_ignore_ascii_case(provider_id)),
            Self::Standings(items) => {
                items.retain(|i| i.provider_id.eq_ignore_ascii_case(provider_id))
            }
        }
    }

    /// Rewrite a provider's own league or match id back to the canonical
    /// one on every item that carries it.
    pub fn relabel_id(&mut self, native: &str, canonical: &str) {
        match self {
            Self::Matches(items) => items
                .iter_mut()
                .filter(|i| i.league_id.as_deref() == Some(native))
                .for_each(|i| i.league_id = Some(canonical.to_string())),
            Self::Odds(items) => items
                .iter_mut()
                .filter(|i| i.match_id == native)
                .for_each(|i| i.match_id = canonical.to_string()),
            Self::Standings(items) => items
                .iter_mut()
                .filter(|i| i.league_id == native)
                .for_each(|i| i.league_id = canonical.to_string()),
        }
    }

    pub fn as_matches(&self) -> Option<&[MatchItem]> {
        match self {
            Self::Matches(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_odds(&self) -> Option<&[OddsItem]> {
        match self {
            Self::Odds(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_standings(&self) -> Option<&[StandingRow]> {
        match self {
            Self::Standings(items) => Some(items),
            _ => None,
        }
    }
}
