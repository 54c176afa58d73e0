//! Per-attempt diagnostics for a single aggregation.

use serde::Serialize;

use crate::errors::RetryClass;

/// How one provider attempt ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AttemptOutcome {
    Success {
        #[serde(rename = "itemCount")]
        item_count: usize,
    },
    /// The provider confirmed there is nothing to return.
    ConfirmedEmpty,
    Failed {
        #[serde(rename = "retryClass")]
        retry_class: RetryClass,
    },
}

/// Record of a single provider attempt.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAttempt {
    pub provider_id: String,
    pub outcome: AttemptOutcome,
    pub message: Option<String>,
    pub elapsed_ms: u64,
}

/// Ordered list of attempts made while resolving one request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FetchDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, provider_id: &str, item_count: usize, elapsed_ms: u64) {
        self.attempts.push(ProviderAttempt {
            provider_id: provider_id.to_string(),
            outcome: AttemptOutcome::Success { item_count },
            message: None,
            elapsed_ms,
        });
    }

    pub fn record_confirmed_empty(&mut self, provider_id: &str, reason: String, elapsed_ms: u64) {
        self.attempts.push(ProviderAttempt {
            provider_id: provider_id.to_string(),
            outcome: AttemptOutcome::ConfirmedEmpty,
            message: Some(reason),
            elapsed_ms,
        });
    }

    pub fn record_error(
        &mut self,
        provider_id: &str,
        retry_class: RetryClass,
        error: String,
        elapsed_ms: u64,
    ) {
        self.attempts.push(ProviderAttempt {
            provider_id: provider_id.to_string(),
            outcome: AttemptOutcome::Failed { retry_class },
            message: Some(error),
            elapsed_ms,
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        if self.attempts.is_empty() {
            return "no providers attempted".to_string();
        }
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                AttemptOutcome::Success { item_count } => {
                    format!("{}: SUCCESS ({} items)", a.provider_id, item_count)
                }
                AttemptOutcome::ConfirmedEmpty => format!("{}: EMPTY", a.provider_id),
                AttemptOutcome::Failed { .. } => format!(
                    "{}: ERROR ({})",
                    a.provider_id,
                    a.message.as_deref().unwrap_or("unknown")
                ),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    pub fn has_success(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| matches!(a.outcome, AttemptOutcome::Success { .. }))
    }

    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed { .. }))
            .map(|a| (a.provider_id.as_str(), a.message.as_deref().unwrap_or_default()))
            .collect()
    }

    /// Message of the last failed attempt, used when every provider failed.
    pub fn last_error(&self) -> Option<&str> {
        self.attempts
            .iter()
            .rev()
            .find(|a| matches!(a.outcome, AttemptOutcome::Failed { .. }))
            .and_then(|a| a.message.as_deref())
    }
}
