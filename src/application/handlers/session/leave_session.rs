//! LeaveSessionHandler - Command handler for leaving a session.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::session::{plan_leave, Participant, ParticipantLeft, Session, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

use super::support::{envelope, retry_on_conflict, status_changed};

/// Command to leave a session.
#[derive(Debug, Clone)]
pub struct LeaveSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Result of a successful leave.
#[derive(Debug, Clone)]
pub struct LeaveSessionResult {
    pub session: Session,
    pub left: Participant,
    /// The waitlisted participant who took the freed seat.
    pub promoted: Option<Participant>,
    pub status_change: Option<SessionStatus>,
}

/// Handler for leaving sessions.
pub struct LeaveSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl LeaveSessionHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: LeaveSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<LeaveSessionResult, SessionError> {
        let result = retry_on_conflict("leave", cmd.session_id, move || {
            self.attempt(cmd.session_id, cmd.user_id)
        })
        .await?;

        let promoted_user_id = result.promoted.as_ref().map(Participant::user_id);
        tracing::info!(
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            promoted = ?promoted_user_id,
            "participant left"
        );

        let left_at = result.left.cancelled_at().unwrap_or_else(Timestamp::now);
        let mut events = vec![envelope(
            &ParticipantLeft {
                event_id: EventId::new(),
                session_id: cmd.session_id,
                user_id: cmd.user_id,
                promoted_user_id,
                left_at,
            },
            &metadata,
        )?];
        if let Some(to) = result.status_change {
            events.push(status_changed(cmd.session_id, to, left_at, &metadata)?);
        }
        self.event_publisher.publish_all(events).await?;

        Ok(result)
    }

    async fn attempt(
        &self,
        session_id: SessionId,
        user_id: UserId,
    ) -> Result<LeaveSessionResult, SessionError> {
        let detail = self
            .repository
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound(session_id))?;

        let plan = plan_leave(&detail.session, &detail.participants, user_id, Timestamp::now())?;
        let session = self.repository.apply(&plan.write).await?;

        Ok(LeaveSessionResult {
            session,
            left: plan.left,
            promoted: plan.promoted,
            status_change: plan.status_change,
        })
    }
}
