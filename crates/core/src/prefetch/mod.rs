//! Prefetch scheduling.
//!
//! A periodic driver that refreshes a fixed set of [`WatchedQuery`]s through
//! the aggregator. Each query carries its own backoff state, so one failing
//! query never delays another. Ticks never overlap: a tick that fires while
//! another is still running does nothing.

mod backoff;
mod query;
mod scheduler;


pub use backoff::{backoff_delay_secs, BackoffState, BackoffTable};
pub use query::{dedup_by_key, parse_watched_list, WatchedQuery};
pub use scheduler::{PrefetchScheduler, QueryStatus, SchedulerHandle, TickOutcome, TickReport};
