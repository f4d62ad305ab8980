//! Model events and the broadcast event bus.
//!
//! Modules publish events on their own channel (e.g. `destroy:model` on
//! `collections/Notes`). Every event is wrapped in an [`EventEnvelope`]
//! carrying the channel, a UUIDv7 event id and a timestamp, then broadcast to
//! all subscribers. Subscribers pick the channels they care about.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::defaults;
use crate::models::Note;

// ============================================================================
// Bus Event (domain payloads)
// ============================================================================

/// Domain events published by entity modules.
///
/// Serialized with a `type` tag, e.g. `{"type":"NoteDestroyed","model":{...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum BusEvent {
    /// A note moved to the trash.
    NoteDestroyed { model: Note },
    /// A note came back from the trash.
    NoteRestored { model: Note },
}

impl BusEvent {
    /// Event name on the channel (e.g. `"destroy:model"`).
    pub fn event_type(&self) -> &'static str {
        match self {
            BusEvent::NoteDestroyed { .. } => defaults::EVENT_DESTROY_MODEL,
            BusEvent::NoteRestored { .. } => defaults::EVENT_RESTORE_MODEL,
        }
    }

    /// The model carried by the event.
    pub fn model(&self) -> &Note {
        match self {
            BusEvent::NoteDestroyed { model } | BusEvent::NoteRestored { model } => model,
        }
    }
}

// ============================================================================
// Event Envelope
// ============================================================================

/// Broadcast wrapper around a [`BusEvent`].
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Unique event identifier (UUIDv7 for temporal ordering).
    pub event_id: Uuid,
    /// Channel the event was published on.
    pub channel: String,
    /// Event name on the channel (e.g. `"restore:model"`).
    pub event_type: String,
    /// When the event occurred (UTC).
    pub occurred_at: DateTime<Utc>,
    /// Partition of the model the event is about.
    pub profile_id: String,
    /// ID of the model the event is about.
    pub entity_id: String,
    /// Domain-specific event data.
    pub payload: BusEvent,
}

impl EventEnvelope {
    pub fn new(channel: impl Into<String>, event: BusEvent) -> Self {
        let model = event.model();
        Self {
            event_id: Uuid::now_v7(),
            channel: channel.into(),
            event_type: event.event_type().to_string(),
            occurred_at: Utc::now(),
            profile_id: model.profile_id.clone(),
            entity_id: model.id.clone(),
            payload: event,
        }
    }

    /// Whether this is `event_type` on `channel`.
    pub fn is(&self, channel: &str, event_type: &str) -> bool {
        self.channel == channel && self.event_type == event_type
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast-based event bus shared by every module on a router.
///
/// Uses `tokio::sync::broadcast`; emitting never blocks. Receivers that fall
/// behind get a `Lagged` error and miss events.
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event on a channel. Dropped silently without subscribers.
    pub fn emit(&self, channel: &str, event: BusEvent) {
        let envelope = EventEnvelope::new(channel, event);
        tracing::debug!(
            channel = %envelope.channel,
            event_type = %envelope.event_type,
            event_id = %envelope.event_id,
            subscriber_count = self.subscriber_count(),
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe to all channels. Each subscriber gets its own stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(defaults::EVENT_BUS_CAPACITY)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> Note {
        Note::new("test").with_id("1")
    }

    #[tokio::test]
    async fn test_event_bus_emit_subscribe() {
        let bus = EventBus::new(32);
        let mut rx = bus.subscribe();

        bus.emit("collections/Notes", BusEvent::NoteDestroyed { model: note() });

        let envelope = rx.recv().await.unwrap();
        assert!(envelope.is("collections/Notes", "destroy:model"));
        assert_eq!(envelope.entity_id, "1");
        assert_eq!(envelope.profile_id, "test");
        assert_eq!(envelope.event_id.get_version_num(), 7);
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new(32);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit("collections/Notes", BusEvent::NoteRestored { model: note() });

        assert_eq!(rx1.recv().await.unwrap().event_type, "restore:model");
        assert_eq!(rx2.recv().await.unwrap().event_type, "restore:model");
    }

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.emit("collections/Notes", BusEvent::NoteRestored { model: note() });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = EventEnvelope::new("collections/Notes", BusEvent::NoteDestroyed { model: note() });
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["event_type"], "destroy:model");
        assert_eq!(json["payload"]["type"], "NoteDestroyed");
        assert_eq!(json["payload"]["model"]["id"], "1");
    }
}
