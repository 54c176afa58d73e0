//! Minimal-shape validation of normalized items.
//!
//! Adapters are trusted to map fields, not to filter garbage. Items that fail
//! a hard check are dropped; soft issues are logged and the item is kept.

use log::warn;

use crate::errors::SportsDataError;
use crate::models::{FetchPayload, MatchItem, OddsItem, StandingRow};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Reject the item.
    Hard,
    /// Keep the item, log a warning.
    Soft,
}

#[derive(Clone, Debug)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Reject matches with a negative score.
    pub reject_negative_scores: bool,
    /// Decimal odds at or below this are rejected.
    pub min_decimal_odds: f64,
    /// Warn when a fixture has no kickoff time.
    pub warn_on_missing_start_time: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            reject_negative_scores: true,
            min_decimal_odds: 1.0,
            warn_on_missing_start_time: true,
        }
    }
}

/// Item validator applied by the registry to every adapter result.
#[derive(Clone, Debug, Default)]
pub struct ItemValidator {
    config: ValidatorConfig,
}

impl ItemValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Drop invalid items from a payload.
    ///
    /// Fails with `ValidationFailed` only when the payload had items and none
    /// of them survived.
    pub fn validate_payload(
        &self,
        payload: FetchPayload,
        provider_id: &str,
    ) -> Result<FetchPayload, SportsDataError> {
        let original = payload.item_count();

        let filtered = match payload {
            FetchPayload::Matches(items) => {
                FetchPayload::Matches(self.retain(items, provider_id, |i| self.check_match(i)))
            }
            FetchPayload::Odds(items) => {
                FetchPayload::Odds(self.retain(items, provider_id, |i| self.check_odds(i)))
            }
            FetchPayload::Standings(items) => {
                FetchPayload::Standings(self.retain(items, provider_id, |i| self.check_standing(i)))
            }
        };

        if original > 0 && filtered.is_empty() {
            return Err(SportsDataError::ValidationFailed {
                message: format!("All {} items from {} failed validation", original, provider_id),
            });
        }

        Ok(filtered)
    }

    fn retain<T>(
        &self,
        items: Vec<T>,
        provider_id: &str,
        check: impl Fn(&T) -> Vec<ValidationIssue>,
    ) -> Vec<T> {
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            let issues = check(&item);
            let hard: Vec<&str> = issues
                .iter()
                .filter(|i| i.severity == ValidationSeverity::Hard)
                .map(|i| i.message.as_str())
                .collect();

            if hard.is_empty() {
                for issue in issues.iter().filter(|i| i.severity == ValidationSeverity::Soft) {
                    warn!("Validation warning from {}: {}", provider_id, issue.message);
                }
                kept.push(item);
            } else {
                warn!("Dropping item from {}: {}", provider_id, hard.join("; "));
            }
        }
        kept
    }

    pub fn check_match(&self, item: &MatchItem) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if item.id.trim().is_empty() {
            issues.push(hard("match id is empty"));
        }
        if item.home.trim().is_empty() || item.away.trim().is_empty() {
            issues.push(hard(format!("match {} is missing a team name", item.id)));
        }
        if self.config.reject_negative_scores
            && (item.score_home.is_some_and(|s| s < 0) || item.score_away.is_some_and(|s| s < 0))
        {
            issues.push(hard(format!("match {} has a negative score", item.id)));
        }
        if self.config.warn_on_missing_start_time && item.start_time.is_none() {
            issues.push(soft(format!("match {} has no start time", item.id)));
        }

        issues
    }

    pub fn check_odds(&self, item: &OddsItem) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if item.match_id.trim().is_empty() {
            issues.push(hard("odds row has no match id"));
        }
        if item.bookmaker.trim().is_empty() {
            issues.push(hard(format!("odds for {} have no bookmaker", item.match_id)));
        }

        let prices = [item.home, item.draw, item.away];
        if prices.iter().all(Option::is_none) {
            issues.push(hard(format!(
                "odds for {} from {} carry no prices",
                item.match_id, item.bookmaker
            )));
        }
        if prices
            .iter()
            .flatten()
            .any(|p| !p.is_finite() || *p <= self.config.min_decimal_odds)
        {
            issues.push(hard(format!(
                "odds for {} from {} are out of range",
                item.match_id, item.bookmaker
            )));
        }

        issues
    }

    pub fn check_standing(&self, item: &StandingRow) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if item.team.trim().is_empty() {
            issues.push(hard(format!("standing at position {} has no team", item.position)));
        }
        if item.position == 0 {
            issues.push(hard(format!("{} has position 0", item.team)));
        }

        issues
    }
}

fn hard(message: impl Into<String>) -> ValidationIssue {
    ValidationIssue {
        severity: ValidationSeverity::Hard,
        message: message.into(),
    }
}

fn soft(message: impl Into<String>) -> ValidationIssue {
    ValidationIssue {
        severity: ValidationSeverity::Soft,
        message: message.into(),
    }
}
