//! UpdateSessionHandler - Command handler for host edits.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::session::{
    check_conflict, plan_update, Participant, Session, SessionChanges, SessionError,
    SessionRule, SessionSnapshot, SessionUpdated,
};
use crate::ports::{EventPublisher, SessionRepository};

use super::input::{parse_court_ids, parse_level};
use super::support::{envelope, retry_on_conflict, status_changed};

/// Command to edit a session. `None` leaves a field as it is.
#[derive(Debug, Clone)]
pub struct UpdateSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub player_level: Option<String>,
    pub cost_per_person: Option<f64>,
    pub allow_cancellation: Option<bool>,
    pub cancellation_deadline_hours: Option<u32>,
    pub rules: Option<Vec<String>>,
    pub max_participants: Option<u32>,
    pub court_ids: Option<Vec<String>>,
}

impl UpdateSessionCommand {
    /// A command that changes nothing yet.
    pub fn new(session_id: SessionId, user_id: UserId) -> Self {
        Self {
            session_id,
            user_id,
            title: None,
            description: None,
            player_level: None,
            cost_per_person: None,
            allow_cancellation: None,
            cancellation_deadline_hours: None,
            rules: None,
            max_participants: None,
            court_ids: None,
        }
    }

    fn to_changes(&self) -> Result<SessionChanges, SessionError> {
        Ok(SessionChanges {
            title: self.title.clone(),
            description: self.description.clone(),
            player_level: self.player_level.as_deref().map(parse_level).transpose()?,
            cost_per_person: self.cost_per_person,
            allow_cancellation: self.allow_cancellation,
            cancellation_deadline_hours: self.cancellation_deadline_hours,
            rules: self
                .rules
                .as_ref()
                .map(|rules| SessionRule::parse_all(rules.iter().map(String::as_str)))
                .transpose()?,
            max_participants: self.max_participants,
            court_ids: self
                .court_ids
                .as_deref()
                .map(parse_court_ids)
                .transpose()?,
        })
    }
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct UpdateSessionResult {
    pub session: Session,
    /// Waitlisted participants seated by a capacity increase.
    pub promoted: Vec<Participant>,
}

/// Handler for updating sessions.
pub struct UpdateSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateSessionHandler {
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
        cmd: UpdateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateSessionResult, SessionError> {
        let changes = cmd.to_changes()?;
        let (session_id, user_id) = (cmd.session_id, cmd.user_id);

        let (result, status_change) = retry_on_conflict("update", session_id, move || {
            self.attempt(session_id, user_id, changes.clone())
        })
        .await?;

        tracing::info!(
            session_id = %session_id,
            version = result.session.version(),
            promoted = result.promoted.len(),
            "session updated"
        );

        let updated_at = result.session.updated_at();
        let mut events = vec![envelope(
            &SessionUpdated {
                event_id: EventId::new(),
                session_id,
                session: SessionSnapshot::from(&result.session),
                promoted_user_ids: result.promoted.iter().map(Participant::user_id).collect(),
                updated_at,
            },
            &metadata,
        )?];
        if let Some(to) = status_change {
            events.push(status_changed(session_id, to, updated_at, &metadata)?);
        }
        self.event_publisher.publish_all(events).await?;

        Ok(result)
    }

    async fn attempt(
        &self,
        session_id: SessionId,
        user_id: UserId,
        changes: SessionChanges,
    ) -> Result<(UpdateSessionResult, Option<SessionStatus>), SessionError> {
        let detail = self
            .repository
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound(session_id))?;

        let plan = plan_update(
            &detail.session,
            &detail.participants,
            user_id,
            changes,
            Timestamp::now(),
        )?;

        if plan.courts_changed {
            let proposed = &plan.write.session;
            for court_id in proposed.court_ids() {
                let existing = self
                    .repository
                    .list_by_court_and_date(*court_id, proposed.date())
                    .await?;
                check_conflict(*court_id, proposed.window(), &existing, Some(session_id))?;
            }
        }

        let session = self.repository.apply(&plan.write).await?;
        Ok((
            UpdateSessionResult {
                session,
                promoted: plan.promoted,
            },
            plan.status_change,
        ))
    }
}
