//! Sports data provider trait definitions.
//!
//! This module defines the capability interface every external data source
//! implements.

use async_trait::async_trait;

use crate::errors::SportsDataError;
use crate::models::{MatchItem, OddsItem, StandingRow};
use crate::resolver::IdScheme;

use super::capabilities::ProviderCapabilities;

/// Trait for sports data providers.
///
/// Implement this trait to add a new data source. The registry uses the
/// provider's capabilities and priority to decide when to call it.
///
/// Each fetch must return an error on failure rather than a partial result
/// wrapped as success. An `Ok` with an empty list is treated as an ambiguous
/// empty response; adapters that know the answer is legitimately empty return
/// [`SportsDataError::ConfirmedEmpty`] instead.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use sportsfeed_providers::provider::{ProviderCapabilities, SportsDataProvider};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl SportsDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             capabilities: &[Capability::Live],
///             sports: &["soccer"],
///             timeout: None,
///         }
///     }
///
///     async fn fetch_live(&self, sport: &str) -> Result<Vec<MatchItem>, SportsDataError> {
///         // ... call the API and map the payload
///     }
/// }
/// ```
#[async_trait]
pub trait SportsDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "API_FOOTBALL".
    /// Used for logging, health tracking, and the priority table.
    fn id(&self) -> &'static str;

    /// Default priority. Lower values are tried first.
    ///
    /// Only seeds the priority table; the admin surface may change it at runtime.
    fn priority(&self) -> i32 {
        10
    }

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Whether league and match ids need translating before a call.
    ///
    /// Adapters returning [`IdScheme::Mapped`] receive their own ids, and
    /// are skipped for ids the registry's id map does not know.
    fn id_scheme(&self) -> IdScheme {
        IdScheme::Canonical
    }

    /// In-play matches for a sport code (e.g. `soccer`).
    async fn fetch_live(&self, sport: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        let _ = sport;
        Err(SportsDataError::not_supported("live", self.id()))
    }

    /// Upcoming and recent fixtures for a league.
    async fn fetch_fixtures(&self, league_id: &str) -> Result<Vec<MatchItem>, SportsDataError> {
        let _ = league_id;
        Err(SportsDataError::not_supported("fixtures", self.id()))
    }

    /// Bookmaker prices for one match.
    async fn fetch_odds(&self, match_id: &str) -> Result<Vec<OddsItem>, SportsDataError> {
        let _ = match_id;
        Err(SportsDataError::not_supported("odds", self.id()))
    }

    /// League table for a league.
    async fn fetch_standings(&self, league_id: &str) -> Result<Vec<StandingRow>, SportsDataError> {
        let _ = league_id;
        Err(SportsDataError::not_supported("standings", self.id()))
    }
}
