//! Participant entity - one user's seat (or waitlist spot) in a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ParticipantId, ParticipantStatus, SessionId, StateMachine, Timestamp, UserId,
};

/// A user's membership in a session.
///
/// # Invariants
///
/// - At most one participant per (session, user)
/// - `cancelled_at` is set exactly when `status` is `Cancelled`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    session_id: SessionId,
    user_id: UserId,
    status: ParticipantStatus,
    joined_at: Timestamp,
    cancelled_at: Option<Timestamp>,
}

impl Participant {
    /// Creates a new participant row for a user joining at `joined_at`.
    pub fn join(
        session_id: SessionId,
        user_id: UserId,
        status: ParticipantStatus,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            id: ParticipantId::new(),
            session_id,
            user_id,
            status,
            joined_at,
            cancelled_at: None,
        }
    }

    /// Reconstitute a participant from persistence.
    pub fn reconstitute(
        id: ParticipantId,
        session_id: SessionId,
        user_id: UserId,
        status: ParticipantStatus,
        joined_at: Timestamp,
        cancelled_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            session_id,
            user_id,
            status,
            joined_at,
            cancelled_at,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> ParticipantStatus {
        self.status
    }

    pub fn joined_at(&self) -> Timestamp {
        self.joined_at
    }

    pub fn cancelled_at(&self) -> Option<Timestamp> {
        self.cancelled_at
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == ParticipantStatus::Confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.status == ParticipantStatus::Pending
    }

    /// Moves a pending participant into a confirmed seat.
    pub fn promote(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ParticipantStatus::Confirmed)?;
        Ok(())
    }

    /// Cancels this participant at `at`.
    pub fn cancel(&mut self, at: Timestamp) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ParticipantStatus::Cancelled)?;
        self.cancelled_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Participant {
        Participant::join(
            SessionId::new(),
            UserId::new(),
            ParticipantStatus::Pending,
            Timestamp::now(),
        )
    }

    #[test]
    fn promote_confirms_pending() {
        let mut p = pending();
        p.promote().unwrap();
        assert!(p.is_confirmed());
    }

    #[test]
    fn promote_fails_for_confirmed() {
        let mut p = pending();
        p.promote().unwrap();
        assert!(p.promote().is_err());
    }

    #[test]
    fn cancel_sets_timestamp() {
        let mut p = pending();
        let at = Timestamp::now();
        p.cancel(at).unwrap();
        assert_eq!(p.status(), ParticipantStatus::Cancelled);
        assert_eq!(p.cancelled_at(), Some(at));
    }

    #[test]
    fn cancelled_participant_cannot_be_reactivated() {
        let mut p = pending();
        p.cancel(Timestamp::now()).unwrap();
        assert!(p.promote().is_err());
        assert!(p.cancel(Timestamp::now()).is_err());
    }
}
