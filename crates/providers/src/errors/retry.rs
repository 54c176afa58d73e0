use serde::Serialize;

/// Classification for fallback policy.
///
/// Used by the aggregator to decide what an adapter failure means for the
/// rest of the chain and for the provider's health record.
///
/// # Behavior Summary
///
/// | Class | Try Next Provider? | Health record |
/// |-------|-------------------|---------------|
/// | `Never` | No | `ok = false` |
/// | `FailoverWithPenalty` | Yes | `ok = false` |
/// | `NextProvider` | Yes | `ok = false` |
/// | `ConfirmedEmpty` | Yes | `ok = true` |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RetryClass {
    /// The request itself is malformed. No adapter can answer it, so the
    /// chain stops and the caller gets the error back.
    Never,

    /// Transient failure such as a timeout or HTTP 429.
    ///
    /// The adapter is considered degraded; the chain moves on.
    FailoverWithPenalty,

    /// The adapter could not produce usable data (server error, parse error,
    /// ambiguous empty response, unsupported capability). The chain moves on.
    NextProvider,

    /// The adapter answered correctly that there is nothing to report
    /// (for example standings of a league in its off-season).
    ///
    /// The chain still moves on, but the adapter is not marked as failing.
    ConfirmedEmpty,
}
