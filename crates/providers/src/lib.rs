//! Sportsfeed provider crate
//!
//! Provider-agnostic access to sports data: live scores, fixtures, odds and
//! league standings.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   DataRequest    |  (capability + parameter, cache key)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | ProviderRegistry |  (priority table, id map, timeouts, validation)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Provider      |  (API-Football, TheSportsDB, ...)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |  FetchPayload    |  (normalized MatchItem / OddsItem / StandingRow)
//! +------------------+
//! ```
//!
//! The fallback loop itself, health tracking and caching live in
//! `sportsfeed-core`.

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;
pub mod resolver;

pub use errors::{RetryClass, SportsDataError};
pub use models::{
    Capability, DataRequest, FetchPayload, MatchItem, MatchStatus, OddsItem, StandingRow,
};
pub use provider::api_football::ApiFootballProvider;
pub use provider::thesportsdb::TheSportsDbProvider;
pub use provider::{ProviderCapabilities, SportsDataProvider};
pub use registry::{
    AttemptOutcome, FetchDiagnostics, ItemValidator, ProviderAttempt, ProviderPriorityEntry,
    ProviderRegistry, ValidatorConfig, DEFAULT_PROVIDER_TIMEOUT,
};
pub use resolver::{IdKind, IdMap, IdScheme};
