//! CancelSessionHandler - Command handler for the host cancelling a session.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, EventId, SessionId, Timestamp, UserId};
use crate::domain::session::{plan_cancel, Session, SessionCancelled, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

use super::support::{envelope, retry_on_conflict};

/// Command to cancel a session.
#[derive(Debug, Clone)]
pub struct CancelSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone)]
pub struct CancelSessionResult {
    pub session: Session,
    pub event: SessionCancelled,
}

/// Handler for cancelling sessions.
pub struct CancelSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelSessionHandler {
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
        cmd: CancelSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CancelSessionResult, SessionError> {
        let (session, participants_cancelled) =
            retry_on_conflict("cancel", cmd.session_id, move || {
                self.attempt(cmd.session_id, cmd.user_id)
            })
            .await?;

        tracing::info!(
            session_id = %cmd.session_id,
            host_id = %cmd.user_id,
            participants_cancelled,
            "session cancelled"
        );

        let event = SessionCancelled {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            cancelled_by: cmd.user_id,
            participants_cancelled,
            cancelled_at: session.updated_at(),
        };
        self.event_publisher
            .publish(envelope(&event, &metadata)?)
            .await?;

        Ok(CancelSessionResult { session, event })
    }

    async fn attempt(
        &self,
        session_id: SessionId,
        user_id: UserId,
    ) -> Result<(Session, usize), SessionError> {
        let detail = self
            .repository
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound(session_id))?;

        let plan = plan_cancel(&detail.session, &detail.participants, user_id, Timestamp::now())?;
        let session = self.repository.apply(&plan.write).await?;

        Ok((session, plan.cancelled_participants.len()))
    }
}
