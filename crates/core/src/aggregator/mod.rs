//! Aggregator: the ordered fallback chain.
//!
//! For one [`DataRequest`] the aggregator walks the enabled providers in
//! priority order and stops at the first usable answer. Every attempt is
//! recorded in the health tracker. Only a successful attempt writes the
//! cache; when the chain is exhausted the previous cached value is left
//! alone and an empty outcome is returned.

#[cfg(test)]
mod aggregator_tests;

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use serde::Serialize;
use sportsfeed_providers::{
    Capability, DataRequest, FetchDiagnostics, FetchPayload, ProviderRegistry, RetryClass,
};

use crate::cache::RawDataCache;
use crate::config::CacheTtls;
use crate::errors::Result;
use crate::health::ProviderHealthTracker;

/// Result of one aggregation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome {
    pub request: DataRequest,
    pub payload: FetchPayload,
    /// Provider that answered, `None` when the chain was exhausted.
    pub provider_id: Option<String>,
    /// No provider answered, but at least one confirmed there is no data.
    pub confirmed_empty: bool,
    pub diagnostics: FetchDiagnostics,
}

impl FetchOutcome {
    fn exhausted(request: &DataRequest, confirmed_empty: bool, diagnostics: FetchDiagnostics) -> Self {
        Self {
            request: request.clone(),
            payload: FetchPayload::empty_for(request.capability()),
            provider_id: None,
            confirmed_empty,
            diagnostics,
        }
    }

    pub fn is_success(&self) -> bool {
        self.provider_id.is_some()
    }

    pub fn item_count(&self) -> usize {
        self.payload.item_count()
    }
}

pub struct Aggregator {
    registry: Arc<ProviderRegistry>,
    cache: Arc<RawDataCache>,
    health: Arc<ProviderHealthTracker>,
    ttls: CacheTtls,
}

impl Aggregator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        cache: Arc<RawDataCache>,
        health: Arc<ProviderHealthTracker>,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            registry,
            cache,
            health,
            ttls,
        }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Fetch `request` through the fallback chain.
    ///
    /// Returns `Err` only for a malformed request. Provider failures are
    /// absorbed: an exhausted chain yields `Ok` with an empty payload.
    pub async fn fetch(&self, request: &DataRequest) -> Result<FetchOutcome> {
        self.fetch_from(request, None).await
    }

    /// Like [`Aggregator::fetch`], but with `source` set only that provider
    /// is tried. A disabled or unknown source exhausts the chain at once.
    pub async fn fetch_from(&self, request: &DataRequest, source: Option<&str>) -> Result<FetchOutcome> {
        request.validate()?;

        let capability = request.capability();
        let key = request.cache_key();
        let mut providers = self.registry.ordered_for(request);
        if let Some(source) = source {
            providers.retain(|p| p.id().eq_ignore_ascii_case(source));
        }
        let mut diagnostics = FetchDiagnostics::new();
        let mut confirmed_empty = false;

        if providers.is_empty() {
            warn!("No enabled providers for '{}'", key);
            return Ok(FetchOutcome::exhausted(request, false, diagnostics));
        }

        for provider in providers {
            let provider_id = provider.id();
            debug!("Fetching '{}' from provider '{}'", key, provider_id);

            let started = Instant::now();
            let result = self.registry.attempt(provider.as_ref(), request).await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(payload) => {
                    self.health.record_attempt(provider_id, capability, true, None);
                    diagnostics.record_success(provider_id, payload.item_count(), elapsed_ms);
                    self.write_cache(&key, &payload, capability);

                    info!(
                        "Fetched {} item(s) for '{}' from '{}' ({})",
                        payload.item_count(),
                        key,
                        provider_id,
                        diagnostics.summary()
                    );
                    return Ok(FetchOutcome {
                        request: request.clone(),
                        payload,
                        provider_id: Some(provider_id.to_string()),
                        confirmed_empty: false,
                        diagnostics,
                    });
                }
                Err(e) => {
                    let retry_class = e.retry_class();
                    match retry_class {
                        RetryClass::Never => {
                            self.health.record_attempt(
                                provider_id,
                                capability,
                                false,
                                Some(e.to_string()),
                            );
                            info!("Terminal error from '{}' for '{}': {}", provider_id, key, e);
                            return Err(e.into());
                        }
                        RetryClass::ConfirmedEmpty => {
                            let message = e.to_string();
                            self.health.record_attempt(
                                provider_id,
                                capability,
                                true,
                                Some(message.clone()),
                            );
                            diagnostics.record_confirmed_empty(provider_id, message, elapsed_ms);
                            confirmed_empty = true;
                            debug!("Provider '{}' confirmed no data for '{}'", provider_id, key);
                        }
                        RetryClass::FailoverWithPenalty => {
                            self.health.record_attempt(
                                provider_id,
                                capability,
                                false,
                                Some(e.to_string()),
                            );
                            diagnostics.record_error(provider_id, retry_class, e.to_string(), elapsed_ms);
                            warn!(
                                "Provider '{}' degraded for '{}': {}, trying next provider",
                                provider_id, key, e
                            );
                        }
                        RetryClass::NextProvider => {
                            self.health.record_attempt(
                                provider_id,
                                capability,
                                false,
                                Some(e.to_string()),
                            );
                            diagnostics.record_error(provider_id, retry_class, e.to_string(), elapsed_ms);
                            debug!(
                                "Provider '{}' failed for '{}': {}, trying next provider",
                                provider_id, key, e
                            );
                        }
                    }
                }
            }
        }

        warn!(
            "All providers exhausted for '{}': {}",
            key,
            diagnostics.summary()
        );
        Ok(FetchOutcome::exhausted(request, confirmed_empty, diagnostics))
    }

    /// Best-effort cache write; a failure is logged and the fetch result
    /// still goes back to the caller.
    fn write_cache(&self, key: &str, payload: &FetchPayload, capability: Capability) {
        match serde_json::to_value(payload) {
            Ok(value) => self.cache.set(key, value, self.ttls.for_capability(capability)),
            Err(e) => warn!("Failed to cache '{}': {}", key, e),
        }
    }
}
