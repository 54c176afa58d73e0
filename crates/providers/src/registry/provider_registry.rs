//! Provider registry: ordering, enablement and single-attempt execution.
//!
//! The registry owns the adapter list and the priority table. It does not
//! loop over providers itself; the caller walks [`ProviderRegistry::ordered_for`]
//! and calls [`ProviderRegistry::attempt`] for each entry so it can record
//! health and cache results in between.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use log::{debug, warn};

use super::settings::{ProviderPriorityEntry, ProviderSettings};
use super::validator::ItemValidator;
use crate::errors::SportsDataError;
use crate::models::{Capability, DataRequest, FetchPayload};
use crate::provider::SportsDataProvider;
use crate::resolver::IdMap;

/// Default time budget for one adapter call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(8);

/// Provider registry.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SportsDataProvider>>,
    settings: RwLock<ProviderSettings>,
    validator: ItemValidator,
    id_map: IdMap,
    default_timeout: Duration,
    timeout_overrides: HashMap<String, Duration>,
}

impl ProviderRegistry {
    /// Create a registry. The priority table is seeded from each provider's
    /// declared capabilities and [`SportsDataProvider::priority`].
    pub fn new(providers: Vec<Arc<dyn SportsDataProvider>>) -> Self {
        let mut settings = ProviderSettings::new();
        for provider in &providers {
            for capability in provider.capabilities().capabilities {
                settings.seed(provider.id(), *capability, provider.priority());
            }
        }

        Self {
            providers,
            settings: RwLock::new(settings),
            validator: ItemValidator::new(),
            id_map: IdMap::builtin(),
            default_timeout: DEFAULT_PROVIDER_TIMEOUT,
            timeout_overrides: HashMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Per-provider timeouts keyed by provider id. These win over the
    /// timeout a provider declares in its capabilities.
    pub fn with_timeout_overrides(mut self, overrides: HashMap<String, Duration>) -> Self {
        self.timeout_overrides = overrides
            .into_iter()
            .map(|(id, timeout)| (id.to_ascii_uppercase(), timeout))
            .collect();
        self
    }

    /// Effective time budget for one call to `provider`.
    pub fn timeout_for(&self, provider: &dyn SportsDataProvider) -> Duration {
        self.timeout_overrides
            .get(&provider.id().to_ascii_uppercase())
            .copied()
            .or(provider.capabilities().timeout)
            .unwrap_or(self.default_timeout)
    }

    pub fn with_validator(mut self, validator: ItemValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the id map. Defaults to [`IdMap::builtin`].
    pub fn with_id_map(mut self, id_map: IdMap) -> Self {
        self.id_map = id_map;
        self
    }

    pub fn id_map(&self) -> &IdMap {
        &self.id_map
    }

    pub fn providers(&self) -> &[Arc<dyn SportsDataProvider>] {
        &self.providers
    }

    pub fn provider(&self, provider_id: &str) -> Option<&Arc<dyn SportsDataProvider>> {
        self.providers
            .iter()
            .find(|p| p.id().eq_ignore_ascii_case(provider_id))
    }

    fn read_settings(&self) -> RwLockReadGuard<'_, ProviderSettings> {
        self.settings.read().unwrap_or_else(|poisoned| {
            warn!("Provider settings lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_settings(&self) -> RwLockWriteGuard<'_, ProviderSettings> {
        self.settings.write().unwrap_or_else(|poisoned| {
            warn!("Provider settings lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Enabled providers eligible for a request, best first.
    ///
    /// Live requests also drop providers that do not cover the sport.
    pub fn ordered_for(&self, request: &DataRequest) -> Vec<Arc<dyn SportsDataProvider>> {
        let capability = request.capability();
        let settings = self.read_settings();

        settings
            .ordered(capability)
            .into_iter()
            .filter_map(|id| self.provider(id))
            .filter(|p| {
                let caps = p.capabilities();
                caps.supports(capability)
                    && match request {
                        DataRequest::Live { sport } => caps.covers_sport(sport),
                        _ => true,
                    }
            })
            .cloned()
            .collect()
    }

    /// Snapshot of the priority table.
    pub fn settings(&self) -> Vec<ProviderPriorityEntry> {
        self.read_settings().entries().to_vec()
    }

    /// Apply a batch of settings changes.
    ///
    /// All entries are checked before any is applied; an unknown
    /// `(provider, capability)` pair rejects the whole batch.
    pub fn update(&self, updates: &[ProviderPriorityEntry]) -> Result<(), SportsDataError> {
        let mut settings = self.write_settings();

        if let Some(unknown) = updates
            .iter()
            .find(|u| settings.get(&u.provider_id, u.capability).is_none())
        {
            return Err(SportsDataError::InvalidRequest(format!(
                "unknown provider setting {}/{}",
                unknown.provider_id, unknown.capability
            )));
        }

        for update in updates {
            settings.apply(update);
        }
        debug!("Applied {} provider setting change(s)", updates.len());
        Ok(())
    }

    pub fn set_enabled(
        &self,
        provider_id: &str,
        capability: Capability,
        enabled: bool,
    ) -> Result<(), SportsDataError> {
        let current = self.entry(provider_id, capability)?;
        self.update(&[ProviderPriorityEntry { enabled, ..current }])
    }

    pub fn set_priority(
        &self,
        provider_id: &str,
        capability: Capability,
        priority: i32,
    ) -> Result<(), SportsDataError> {
        let current = self.entry(provider_id, capability)?;
        self.update(&[ProviderPriorityEntry { priority, ..current }])
    }

    fn entry(
        &self,
        provider_id: &str,
        capability: Capability,
    ) -> Result<ProviderPriorityEntry, SportsDataError> {
        self.read_settings()
            .get(provider_id, capability)
            .cloned()
            .ok_or_else(|| {
                SportsDataError::InvalidRequest(format!(
                    "unknown provider setting {}/{}",
                    provider_id, capability
                ))
            })
    }

    /// Run one adapter call for a request.
    ///
    /// League and match ids are first translated into the provider's own
    /// numbering, and translated back on the returned items. The call is
    /// bounded by the provider's timeout (or the registry default). When the
    /// budget runs out the in-flight future is dropped, so a late
    /// answer can never be observed. Successful results are validated and
    /// stamped with the provider id; an empty result without explicit
    /// confirmation becomes [`SportsDataError::EmptyResponse`].
    pub async fn attempt(
        &self,
        provider: &dyn SportsDataProvider,
        request: &DataRequest,
    ) -> Result<FetchPayload, SportsDataError> {
        let provider_id = provider.id();
        let timeout = self.timeout_for(provider);
        let resolved = self.id_map.resolve(provider, request)?;

        let call = dispatch(provider, &resolved.request);
        let payload = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SportsDataError::Timeout {
                    provider: provider_id.to_string(),
                });
            }
        };

        if payload.is_empty() {
            return Err(SportsDataError::EmptyResponse {
                provider: provider_id.to_string(),
            });
        }

        let mut payload = self.validator.validate_payload(payload, provider_id)?;
        payload.stamp_provider(provider_id);
        if let Some(native) = &resolved.native_id {
            payload.relabel_id(native, request.param().trim());
        }
        Ok(payload)
    }
}

async fn dispatch(
    provider: &dyn SportsDataProvider,
    request: &DataRequest,
) -> Result<FetchPayload, SportsDataError> {
    match request {
        DataRequest::Live { sport } => provider.fetch_live(sport).await.map(FetchPayload::Matches),
        DataRequest::Fixtures { league_id } => provider
            .fetch_fixtures(league_id)
            .await
            .map(FetchPayload::Matches),
        DataRequest::Odds { match_id } => provider.fetch_odds(match_id).await.map(FetchPayload::Odds),
        DataRequest::Standings { league_id } => provider
            .fetch_standings(league_id)
            .await
            .map(FetchPayload::Standings),
    }
}
