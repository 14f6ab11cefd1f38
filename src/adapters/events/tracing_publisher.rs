//! Event publisher that writes each event to the structured log.
//!
//! Used when no message broker is configured; downstream consumers can
//! tail the JSON log output.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

#[derive(Debug, Clone, Default)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::info!(
            target: "badbuddy::events",
            event_id = %event.event_id,
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            payload = %event.payload,
            "domain event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EventId, EventMetadata, Timestamp};

    #[tokio::test]
    async fn publish_never_fails() {
        let publisher = TracingEventPublisher::new();
        let envelope = EventEnvelope {
            event_id: EventId::new(),
            event_type: "session.cancelled.v1".to_string(),
            schema_version: 1,
            aggregate_id: "s-1".to_string(),
            aggregate_type: "Session".to_string(),
            occurred_at: Timestamp::now(),
            payload: serde_json::json!({"participants_cancelled": 2}),
            metadata: EventMetadata::default(),
        };
        assert!(publisher.publish(envelope).await.is_ok());
    }
}
