//! Per-capability provider ordering and enablement.

use serde::{Deserialize, Serialize};

use crate::models::Capability;

/// One row of the provider priority table.
///
/// Lower `priority` is tried first. Disabled entries are never attempted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPriorityEntry {
    pub provider_id: String,
    pub capability: Capability,
    pub priority: i32,
    pub enabled: bool,
}

/// Priority table keyed by `(provider, capability)`.
///
/// Entries keep their registration order, which is the tie-breaker when two
/// providers share a priority.
#[derive(Clone, Debug, Default)]
pub struct ProviderSettings {
    entries: Vec<ProviderPriorityEntry>,
}

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default entry unless one already exists.
    pub fn seed(&mut self, provider_id: &str, capability: Capability, priority: i32) {
        if self.get(provider_id, capability).is_none() {
            self.entries.push(ProviderPriorityEntry {
                provider_id: provider_id.to_string(),
                capability,
                priority,
                enabled: true,
            });
        }
    }

    pub fn get(&self, provider_id: &str, capability: Capability) -> Option<&ProviderPriorityEntry> {
        self.entries
            .iter()
            .find(|e| e.capability == capability && e.provider_id.eq_ignore_ascii_case(provider_id))
    }

    fn get_mut(
        &mut self,
        provider_id: &str,
        capability: Capability,
    ) -> Option<&mut ProviderPriorityEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.capability == capability && e.provider_id.eq_ignore_ascii_case(provider_id))
    }

    /// Replace an existing entry's priority and enabled flag.
    ///
    /// Returns `false` when no such `(provider, capability)` pair is known.
    pub fn apply(&mut self, update: &ProviderPriorityEntry) -> bool {
        match self.get_mut(&update.provider_id, update.capability) {
            Some(entry) => {
                entry.priority = update.priority;
                entry.enabled = update.enabled;
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[ProviderPriorityEntry] {
        &self.entries
    }

    /// Enabled provider ids for a capability, best first.
    pub fn ordered(&self, capability: Capability) -> Vec<&str> {
        let mut rows: Vec<&ProviderPriorityEntry> = self
            .entries
            .iter()
            .filter(|e| e.capability == capability && e.enabled)
            .collect();
        // sort_by_key is stable, registration order breaks ties
        rows.sort_by_key(|e| e.priority);
        rows.into_iter().map(|e| e.provider_id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_by_priority_then_registration() {
        let mut settings = ProviderSettings::new();
        settings.seed("B", Capability::Fixtures, 2);
        settings.seed("A", Capability::Fixtures, 1);
        settings.seed("C", Capability::Fixtures, 2);
        settings.seed("A", Capability::Odds, 1);

        assert_eq!(settings.ordered(Capability::Fixtures), vec!["A", "B", "C"]);
        assert_eq!(settings.ordered(Capability::Odds), vec!["A"]);
        assert!(settings.ordered(Capability::Live).is_empty());
    }

    #[test]
    fn test_apply_disables_and_reorders() {
        let mut settings = ProviderSettings::new();
        settings.seed("A", Capability::Standings, 1);
        settings.seed("B", Capability::Standings, 2);

        assert!(settings.apply(&ProviderPriorityEntry {
            provider_id: "a".to_string(),
            capability: Capability::Standings,
            priority: 1,
            enabled: false,
        }));
        assert_eq!(settings.ordered(Capability::Standings), vec!["B"]);

        assert!(!settings.apply(&ProviderPriorityEntry {
            provider_id: "Z".to_string(),
            capability: Capability::Standings,
            priority: 0,
            enabled: true,
        }));
    }

    #[test]
    fn test_seed_does_not_overwrite() {
        let mut settings = ProviderSettings::new();
        settings.seed("A", Capability::Live, 5);
        settings.seed("A", Capability::Live, 1);
        assert_eq!(settings.entries().len(), 1);
        assert_eq!(settings.entries()[0].priority, 5);
    }
}
