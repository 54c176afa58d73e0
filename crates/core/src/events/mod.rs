//! Prefetch notifications.
//!
//! The scheduler publishes one event per processed watched query. Runtime
//! adapters (the HTTP server) implement [`PrefetchEventSink`] to fan events
//! out to log collectors and streaming clients.

mod prefetch_event;
mod sink;

pub use prefetch_event::*;
pub use sink::*;
