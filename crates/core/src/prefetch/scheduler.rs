//! Prefetch scheduler.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use sportsfeed_providers::Capability;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::{dedup_by_key, BackoffState, BackoffTable, WatchedQuery};
use crate::aggregator::{Aggregator, FetchOutcome};
use crate::cache::RawDataCache;
use crate::errors::Result;
use crate::events::{PrefetchEvent, PrefetchEventSink};

/// Summary of one completed tick.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub refreshed: usize,
    pub failed: usize,
    pub skipped_backoff: usize,
    pub cache_entries_removed: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "report")]
pub enum TickOutcome {
    Completed(TickReport),
    /// Another tick was still running; nothing was done.
    Skipped,
}

/// Last known prefetch result for one watched query.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStatus {
    pub query: String,
    pub data_type: Option<Capability>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_item_count: Option<usize>,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Handle to a running scheduler loop.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the timer and wait for the loop to exit. A tick already in
    /// flight runs to completion in its own task.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Prefetch scheduler task ended abnormally: {}", e);
        }
    }
}

/// Clears the in-flight flag when a tick ends, even by panic.
struct TickGuard<'a>(&'a AtomicBool);

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PrefetchScheduler {
    aggregator: Arc<Aggregator>,
    cache: Arc<RawDataCache>,
    sink: Arc<dyn PrefetchEventSink>,
    watched: Vec<WatchedQuery>,
    tick_interval: Duration,
    backoff: BackoffTable,
    in_flight: AtomicBool,
    last_report: Mutex<Option<TickReport>>,
    statuses: Mutex<HashMap<String, QueryStatus>>,
}

impl PrefetchScheduler {
    pub fn new(
        aggregator: Arc<Aggregator>,
        cache: Arc<RawDataCache>,
        sink: Arc<dyn PrefetchEventSink>,
        watched: Vec<WatchedQuery>,
        tick_interval: Duration,
        backoff: BackoffTable,
    ) -> Self {
        Self {
            aggregator,
            cache,
            sink,
            watched: dedup_by_key(watched),
            tick_interval,
            backoff,
            in_flight: AtomicBool::new(false),
            last_report: Mutex::new(None),
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub fn watched(&self) -> &[WatchedQuery] {
        &self.watched
    }

    pub fn is_running_tick(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn backoff_states(&self) -> Vec<BackoffState> {
        self.backoff.snapshot()
    }

    pub fn last_report(&self) -> Option<TickReport> {
        lock(&self.last_report).clone()
    }

    /// Status of every watched query, in configuration order.
    pub fn query_statuses(&self) -> Vec<QueryStatus> {
        let statuses = lock(&self.statuses);
        self.watched
            .iter()
            .map(|q| {
                statuses.get(&q.key()).cloned().unwrap_or_else(|| QueryStatus {
                    query: q.key(),
                    data_type: Some(q.data_type()),
                    ..QueryStatus::default()
                })
            })
            .collect()
    }

    /// Spawn the periodic loop. Each timer fire spawns a tick; fires that
    /// land while a tick is running are skipped by [`Self::run_tick`].
    pub fn start(self: &Arc<Self>) -> SchedulerHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let scheduler = Arc::clone(self);

        let task = tokio::spawn(async move {
            info!(
                "Prefetch scheduler started ({} watched queries, {}s interval)",
                scheduler.watched.len(),
                scheduler.tick_interval.as_secs()
            );

            let mut ticker = interval(scheduler.tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let scheduler = Arc::clone(&scheduler);
                        tokio::spawn(async move {
                            scheduler.run_tick().await;
                        });
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Prefetch scheduler stopped");
        });

        SchedulerHandle { shutdown, task }
    }

    pub async fn run_tick(&self) -> TickOutcome {
        self.run_tick_at(Utc::now()).await
    }

    /// Run one tick as of `now`.
    ///
    /// Watched queries are fetched concurrently, each in its own task, so a
    /// slow or panicking query cannot hold up the others.
    pub async fn run_tick_at(&self, now: DateTime<Utc>) -> TickOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Prefetch tick skipped: previous tick still running");
            return TickOutcome::Skipped;
        }
        let _guard = TickGuard(&self.in_flight);

        let mut refreshed = 0;
        let mut failed = 0;
        let mut skipped_backoff = 0;

        let mut pending: Vec<(WatchedQuery, JoinHandle<Result<FetchOutcome>>)> = Vec::new();
        for query in &self.watched {
            if !self.backoff.is_allowed_at(query, now) {
                debug!("Prefetch of '{}' deferred by backoff", query);
                skipped_backoff += 1;
                continue;
            }

            let aggregator = Arc::clone(&self.aggregator);
            let request = query.request().clone();
            let handle = tokio::spawn(async move { aggregator.fetch(&request).await });
            pending.push((query.clone(), handle));
        }

        for (query, handle) in pending {
            let result = match handle.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(format!("prefetch task failed: {}", e)),
            };

            match result {
                Ok(outcome) if outcome.is_success() || outcome.confirmed_empty => {
                    self.on_success(&query, outcome.item_count(), now);
                    refreshed += 1;
                }
                Ok(outcome) => {
                    let message = outcome
                        .diagnostics
                        .last_error()
                        .map(|e| format!("all providers failed: {}", e))
                        .unwrap_or_else(|| "no provider returned data".to_string());
                    self.on_failure(&query, message, now);
                    failed += 1;
                }
                Err(message) => {
                    self.on_failure(&query, message, now);
                    failed += 1;
                }
            }
        }

        let cache_entries_removed = self.cache.cleanup();

        let report = TickReport {
            started_at: now,
            finished_at: Utc::now(),
            refreshed,
            failed,
            skipped_backoff,
            cache_entries_removed,
        };
        info!(
            "Prefetch tick finished: {} refreshed, {} failed, {} in backoff, {} expired entries removed",
            refreshed, failed, skipped_backoff, cache_entries_removed
        );
        *lock(&self.last_report) = Some(report.clone());

        TickOutcome::Completed(report)
    }

    fn on_success(&self, query: &WatchedQuery, item_count: usize, now: DateTime<Utc>) {
        self.backoff.record_success(query);
        {
            let mut statuses = lock(&self.statuses);
            let status = status_entry(&mut statuses, query);
            status.last_success_at = Some(now);
            status.last_item_count = Some(item_count);
        }
        self.sink
            .emit(PrefetchEvent::updated(query.data_type(), query.key(), item_count));
    }

    fn on_failure(&self, query: &WatchedQuery, message: String, now: DateTime<Utc>) {
        let delay = self.backoff.record_failure_at(query, &message, now);
        warn!(
            "Prefetch of '{}' failed: {} (retry in {}s)",
            query, message, delay
        );
        {
            let mut statuses = lock(&self.statuses);
            let status = status_entry(&mut statuses, query);
            status.last_failure_at = Some(now);
            status.last_error = Some(message.clone());
        }
        self.sink
            .emit(PrefetchEvent::failed(query.data_type(), query.key(), message, delay));
    }
}

fn status_entry<'a>(
    statuses: &'a mut HashMap<String, QueryStatus>,
    query: &WatchedQuery,
) -> &'a mut QueryStatus {
    statuses.entry(query.key()).or_insert_with(|| QueryStatus {
        query: query.key(),
        data_type: Some(query.data_type()),
        ..QueryStatus::default()
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Prefetch scheduler lock was poisoned, recovering");
        poisoned.into_inner()
    })
}
