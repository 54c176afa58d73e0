use serde_json::Value;
use sportsfeed_core::events::{PrefetchEvent, PrefetchEventSink, TOPIC_ERROR, TOPIC_UPDATES};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Serializable envelope that carries event names and optional payloads.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub payload: Option<Value>,
}

impl ServerEvent {
    pub fn with_payload(name: &'static str, payload: Value) -> Self {
        Self {
            name,
            payload: Some(payload),
        }
    }
}

/// Lightweight broadcast bus that fans out events to any connected clients.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        // No subscribers and lagging listeners are both fine here.
        let _ = self.sender.send(event);
    }
}

impl PrefetchEventSink for EventBus {
    fn emit(&self, event: PrefetchEvent) {
        let name = event.topic();
        match serde_json::to_value(&event) {
            Ok(payload) => self.publish(ServerEvent::with_payload(name, payload)),
            Err(err) => tracing::error!(
                "Failed to serialize {} event for '{}': {}",
                name,
                event.query(),
                err
            ),
        }
    }
}

/// Subscribes to the bus and writes every prefetch event to the log.
pub fn spawn_event_logger(bus: &EventBus) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let payload = event.payload.unwrap_or(Value::Null);
                    match event.name {
                        TOPIC_ERROR => tracing::warn!(topic = event.name, %payload, "prefetch event"),
                        TOPIC_UPDATES => tracing::info!(topic = event.name, %payload, "prefetch event"),
                        other => tracing::debug!(topic = other, %payload, "event"),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event logger lagged, {} event(s) dropped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportsfeed_providers::Capability;

    #[tokio::test]
    async fn test_prefetch_events_reach_subscribers() {
        let bus = EventBus::new(8);
        let mut receiver = bus.subscribe();

        bus.emit(PrefetchEvent::updated(Capability::Live, "live:soccer".to_string(), 3));
        bus.emit(PrefetchEvent::failed(
            Capability::Fixtures,
            "fixtures:39".to_string(),
            "timed out".to_string(),
            60,
        ));

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.name, TOPIC_UPDATES);
        let payload = first.payload.unwrap();
        assert_eq!(payload["query"], "live:soccer");
        assert_eq!(payload["itemCount"], 3);

        let second = receiver.recv().await.unwrap();
        assert_eq!(second.name, TOPIC_ERROR);
        assert_eq!(second.payload.unwrap()["retryInSecs"], 60);
    }

    #[tokio::test]
    async fn test_published_payload_names_the_query() {
        let bus = EventBus::new(4);
        let mut receiver = bus.subscribe();
        let event = PrefetchEvent::failed(
            Capability::Standings,
            "standings:39".to_string(),
            "down".to_string(),
            120,
        );
        let query = event.query().to_string();

        bus.emit(event);
        let published = receiver.recv().await.unwrap();
        assert_eq!(published.payload.unwrap()["query"], query);
    }

    #[test]
    fn test_emit_without_subscribers_does_not_fail() {
        let bus = EventBus::new(1);
        bus.emit(PrefetchEvent::updated(Capability::Odds, "odds:7".to_string(), 0));
    }
}
