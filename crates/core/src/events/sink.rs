//! Prefetch event sink trait and implementations.

#[cfg(test)]
use std::sync::{Arc, Mutex, MutexGuard};

use super::PrefetchEvent;

/// Receiver of prefetch notifications.
///
/// `emit()` must be fast and non-blocking, and a failure to deliver must be
/// handled inside the sink. The scheduler never waits on or inspects the
/// outcome of a publish.
pub trait PrefetchEventSink: Send + Sync {
    fn emit(&self, event: PrefetchEvent);

    fn emit_batch(&self, events: Vec<PrefetchEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Discards every event.
#[derive(Clone, Default)]
pub struct NoOpEventSink;

impl PrefetchEventSink for NoOpEventSink {
    fn emit(&self, _event: PrefetchEvent) {}
}

/// Collects events in memory.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockEventSink {
    events: Arc<Mutex<Vec<PrefetchEvent>>>,
}

#[cfg(test)]
impl MockEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PrefetchEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<PrefetchEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
impl PrefetchEventSink for MockEventSink {
    fn emit(&self, event: PrefetchEvent) {
        self.lock().push(event);
    }
}
