//! Session domain events.
//!
//! Events published after a lifecycle write commits:
//! - `SessionCreated` - New session created by its host
//! - `SessionUpdated` - Host edited session fields
//! - `ParticipantJoined` - User took a seat or a waitlist spot
//! - `ParticipantLeft` - User left, possibly promoting someone from the waitlist
//! - `SessionStatusChanged` - Session flipped between open and full
//! - `SessionCancelled` - Host cancelled the session

use serde::{Deserialize, Serialize};

use super::SessionSnapshot;
use crate::domain::foundation::{
    domain_event, EventId, ParticipantStatus, SessionId, SessionStatus, Timestamp, UserId,
};

// ════════════════════════════════════════════════════════════════════════════
// SessionCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a host creates a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub session: SessionSnapshot,
    pub created_at: Timestamp,
}

domain_event!(
    SessionCreated,
    event_type = "session.created.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionUpdated
// ════════════════════════════════════════════════════════════════════════════

/// Published when the host edits a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUpdated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub session: SessionSnapshot,
    /// Waitlisted users moved into seats by a capacity increase.
    pub promoted_user_ids: Vec<UserId>,
    pub updated_at: Timestamp,
}

domain_event!(
    SessionUpdated,
    event_type = "session.updated.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = updated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ParticipantJoined
// ════════════════════════════════════════════════════════════════════════════

/// Published when a user joins, either confirmed or pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantJoined {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub status: ParticipantStatus,
    pub joined_at: Timestamp,
}

domain_event!(
    ParticipantJoined,
    event_type = "session.participant_joined.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = joined_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ParticipantLeft
// ════════════════════════════════════════════════════════════════════════════

/// Published when a participant leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantLeft {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub user_id: UserId,
    /// The waitlisted user who took the freed seat, if any.
    pub promoted_user_id: Option<UserId>,
    pub left_at: Timestamp,
}

domain_event!(
    ParticipantLeft,
    event_type = "session.participant_left.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = left_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionStatusChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when a session fills up or reopens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusChanged {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub from: SessionStatus,
    pub to: SessionStatus,
    pub changed_at: Timestamp,
}

domain_event!(
    SessionStatusChanged,
    event_type = "session.status_changed.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionCancelled
// ════════════════════════════════════════════════════════════════════════════

/// Published when the host cancels a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCancelled {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub cancelled_by: UserId,
    pub participants_cancelled: usize,
    pub cancelled_at: Timestamp,
}

domain_event!(
    SessionCancelled,
    event_type = "session.cancelled.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = cancelled_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainEvent, SerializableDomainEvent};

    #[test]
    fn participant_joined_envelope_carries_status() {
        let event = ParticipantJoined {
            event_id: EventId::new(),
            session_id: SessionId::new(),
            user_id: UserId::new(),
            status: ParticipantStatus::Pending,
            joined_at: Timestamp::now(),
        };

        let envelope = event.to_envelope().unwrap();
        assert_eq!(envelope.event_type, "session.participant_joined.v1");
        assert_eq!(envelope.aggregate_id, event.session_id.to_string());
        assert_eq!(envelope.payload["status"], "pending");
    }

    #[test]
    fn cancelled_event_uses_session_aggregate() {
        let event = SessionCancelled {
            event_id: EventId::new(),
            session_id: SessionId::new(),
            cancelled_by: UserId::new(),
            participants_cancelled: 3,
            cancelled_at: Timestamp::now(),
        };
        assert_eq!(event.aggregate_type(), "Session");
        assert_eq!(event.event_type(), "session.cancelled.v1");
    }
}
