//! Helpers shared by the session command handlers.

use std::future::Future;

use crate::domain::foundation::{
    CommandMetadata, EventEnvelope, EventId, SerializableDomainEvent, SessionId, SessionStatus,
    Timestamp,
};
use crate::domain::session::{SessionError, SessionStatusChanged};

/// Runs `attempt` and, if it lost a version race, runs it once more
/// against a fresh read. A second conflict is returned to the caller.
pub(super) async fn retry_on_conflict<T, F, Fut>(
    operation: &'static str,
    session_id: SessionId,
    mut attempt: F,
) -> Result<T, SessionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SessionError>>,
{
    match attempt().await {
        Err(SessionError::Conflict) => {
            tracing::debug!(%session_id, operation, "version conflict, retrying");
            let result = attempt().await;
            if matches!(result, Err(SessionError::Conflict)) {
                tracing::warn!(%session_id, operation, "version conflict persisted after retry");
            }
            result
        }
        result => result,
    }
}

/// Builds the envelope for `event` tagged with the request's correlation
/// and user IDs.
pub(super) fn envelope<E: SerializableDomainEvent>(
    event: &E,
    metadata: &CommandMetadata,
) -> Result<EventEnvelope, SessionError> {
    Ok(event
        .to_envelope()?
        .with_correlation_id(metadata.correlation_id())
        .with_user_id(metadata.user_id.to_string()))
}

/// Envelope for a capacity-driven flip, which is always between open and full.
pub(super) fn status_changed(
    session_id: SessionId,
    to: SessionStatus,
    changed_at: Timestamp,
    metadata: &CommandMetadata,
) -> Result<EventEnvelope, SessionError> {
    let from = match to {
        SessionStatus::Full => SessionStatus::Open,
        _ => SessionStatus::Full,
    };
    envelope(
        &SessionStatusChanged {
            event_id: EventId::new(),
            session_id,
            from,
            to,
            changed_at,
        },
        metadata,
    )
}
