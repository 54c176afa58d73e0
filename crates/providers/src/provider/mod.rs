//! Sports data provider abstractions and implementations.
//!
//! This module contains:
//! - The `SportsDataProvider` trait that all adapters implement
//! - Provider capability descriptions
//! - Concrete adapters (API-Football, TheSportsDB)
//!
//! Adapters map their own payloads into the normalized schema in
//! [`crate::models`]; ordering, timeouts and validation happen in the
//! registry, not in the adapters.

mod capabilities;
mod traits;

pub mod api_football;
pub mod thesportsdb;

pub use capabilities::ProviderCapabilities;
pub use traits::SportsDataProvider;
