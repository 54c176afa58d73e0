//! Sports data models
//!
//! This module contains the core data types shared by adapters and consumers:
//! - `capability` - The four query kinds (Capability)
//! - `request` - Typed requests and cache-key derivation (DataRequest)
//! - `items` - Normalized result schema (MatchItem, OddsItem, StandingRow)
//! - `payload` - Capability-specific result container (FetchPayload)

mod capability;
mod items;
mod payload;
mod request;

pub use capability::Capability;
pub use items::{MatchItem, MatchStatus, OddsItem, StandingRow};
pub use payload::FetchPayload;
pub use request::DataRequest;
