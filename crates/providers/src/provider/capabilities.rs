//! Provider capability description.

use std::time::Duration;

use crate::models::Capability;

/// Describes what a sports data provider can do.
///
/// Used by the registry to decide which adapters are eligible for a
/// capability and how long a single call may take.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Capabilities this provider implements.
    pub capabilities: &'static [Capability],

    /// Sports this provider covers for live scores (e.g. `soccer`).
    /// Empty means "any".
    pub sports: &'static [&'static str],

    /// Per-call timeout override. `None` uses the registry default.
    pub timeout: Option<Duration>,
}

impl ProviderCapabilities {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn covers_sport(&self, sport: &str) -> bool {
        self.sports.is_empty() || self.sports.iter().any(|s| s.eq_ignore_ascii_case(sport))
    }
}
