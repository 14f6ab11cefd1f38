//! JoinSessionHandler - Command handler for taking a seat or a waitlist spot.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::session::{plan_join, Participant, ParticipantJoined, Session, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

use super::support::{envelope, retry_on_conflict, status_changed};

/// Command to join a session.
#[derive(Debug, Clone)]
pub struct JoinSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinSessionResult {
    pub session: Session,
    /// Confirmed if a seat was free, pending otherwise.
    pub participant: Participant,
    pub status_change: Option<SessionStatus>,
}

/// Handler for joining sessions.
pub struct JoinSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl JoinSessionHandler {
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
        cmd: JoinSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<JoinSessionResult, SessionError> {
        let result = retry_on_conflict("join", cmd.session_id, move || {
            self.attempt(cmd.session_id, cmd.user_id)
        })
        .await?;

        tracing::info!(
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            status = %result.participant.status(),
            "participant joined"
        );

        let now = result.participant.joined_at();
        let mut events = vec![envelope(
            &ParticipantJoined {
                event_id: EventId::new(),
                session_id: cmd.session_id,
                user_id: cmd.user_id,
                status: result.participant.status(),
                joined_at: now,
            },
            &metadata,
        )?];
        if let Some(to) = result.status_change {
            events.push(status_changed(cmd.session_id, to, now, &metadata)?);
        }
        self.event_publisher.publish_all(events).await?;

        Ok(result)
    }

    async fn attempt(
        &self,
        session_id: SessionId,
        user_id: UserId,
    ) -> Result<JoinSessionResult, SessionError> {
        let detail = self
            .repository
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound(session_id))?;

        let plan = plan_join(&detail.session, &detail.participants, user_id, Timestamp::now())?;
        let session = self.repository.apply(&plan.write).await?;

        Ok(JoinSessionResult {
            session,
            participant: plan.participant,
            status_change: plan.status_change,
        })
    }
}
