//! Sportsfeed Core - aggregation, caching and prefetch scheduling.
//!
//! This crate turns a set of unreliable [`SportsDataProvider`]s into a
//! warm, queryable cache:
//!
//! - [`cache`] - TTL key-value store with lazy expiry and explicit sweep
//! - [`health`] - last outcome per `(provider, capability)`
//! - [`aggregator`] - ordered fallback chain that writes the cache
//! - [`prefetch`] - periodic refresh of watched queries with backoff
//! - [`events`] - prefetch notifications and the sink trait
//! - [`service`] - read surface over the cache for consumers
//! - [`context`] - the object that owns all of the above
//!
//! [`SportsDataProvider`]: sportsfeed_providers::SportsDataProvider

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod health;
pub mod prefetch;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{Aggregator, FetchOutcome};
pub use cache::{CacheExport, RawDataCache};
pub use config::{CacheTtls, EngineConfig};
pub use context::EngineContext;
pub use errors::{Error, Result};
pub use events::{PrefetchEvent, PrefetchEventSink};
pub use health::{ProviderHealthRecord, ProviderHealthTracker};
pub use prefetch::{PrefetchScheduler, TickOutcome, TickReport, WatchedQuery};
pub use service::SportsDataService;
