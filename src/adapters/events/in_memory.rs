//! Event bus that keeps every published envelope in memory.
//!
//! Handler and integration tests inspect it to check which session events a
//! command produced and in what order.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking test must not hide events from the tests that follow it.
    fn log(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Everything published so far, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.log().clone()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.log()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Event types in publish order, e.g. `["session.participant_joined.v1", ...]`.
    pub fn event_types(&self) -> Vec<String> {
        self.log().iter().map(|e| e.event_type.clone()).collect()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.log().iter().any(|e| e.event_type == event_type)
    }

    pub fn event_count(&self) -> usize {
        self.log().len()
    }

    pub fn clear(&self) {
        self.log().clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.log().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{
        EventId, ParticipantStatus, SerializableDomainEvent, SessionId, Timestamp, UserId,
    };
    use crate::domain::session::ParticipantJoined;

    fn joined(session_id: SessionId) -> EventEnvelope {
        ParticipantJoined {
            event_id: EventId::new(),
            session_id,
            user_id: UserId::new(),
            status: ParticipantStatus::Confirmed,
            joined_at: Timestamp::now(),
        }
        .to_envelope()
        .unwrap()
    }

    #[tokio::test]
    async fn keeps_publish_order() {
        let bus = InMemoryEventBus::new();
        let session_id = SessionId::new();
        let mut status = joined(session_id);
        status.event_type = "session.status_changed.v1".to_string();

        bus.publish_all(vec![joined(session_id), status]).await.unwrap();

        assert_eq!(
            bus.event_types(),
            vec!["session.participant_joined.v1", "session.status_changed.v1"]
        );
        assert_eq!(bus.events_of_type("session.participant_joined.v1").len(), 1);
    }

    #[tokio::test]
    async fn clear_forgets_setup_events() {
        let bus = InMemoryEventBus::new();
        bus.publish(joined(SessionId::new())).await.unwrap();
        assert!(bus.has_event("session.participant_joined.v1"));

        bus.clear();

        assert_eq!(bus.event_count(), 0);
        assert!(bus.published_events().is_empty());
    }
}
