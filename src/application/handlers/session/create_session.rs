//! CreateSessionHandler - Command handler for creating new sessions.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, ParticipantStatus, SessionId, Timestamp, UserId, VenueId,
};
use crate::domain::session::{
    check_conflict, validate_against_ranges, Participant, ScheduleLimits, Session, SessionCreated,
    SessionError, SessionFields, SessionRule, SessionSnapshot,
};
use crate::ports::{EventPublisher, SessionDetail, SessionRepository, VenueDirectory};

use super::input::{parse_court_ids, parse_id, parse_level, parse_window};
use super::support::envelope;

/// Command to create a new session.
///
/// Identifiers, dates and times arrive as strings and are parsed by the
/// handler. The caller becomes the host.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub user_id: UserId,
    pub venue_id: String,
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    pub player_level: String,
    pub max_participants: u32,
    pub cost_per_person: f64,
    pub allow_cancellation: bool,
    pub cancellation_deadline_hours: Option<u32>,
    pub court_ids: Vec<String>,
    pub rules: Vec<String>,
}

/// Result of successful session creation.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub detail: SessionDetail,
    pub event: SessionCreated,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    repository: Arc<dyn SessionRepository>,
    venues: Arc<dyn VenueDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
    limits: ScheduleLimits,
}

impl CreateSessionHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        venues: Arc<dyn VenueDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
        limits: ScheduleLimits,
    ) -> Self {
        Self {
            repository,
            venues,
            event_publisher,
            limits,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateSessionResult, SessionError> {
        // 1. Parse and check the fields
        let venue_id: VenueId = parse_id("venue_id", &cmd.venue_id)?;
        let fields = SessionFields {
            host_id: cmd.user_id,
            venue_id,
            title: cmd.title,
            description: cmd.description,
            window: parse_window(&cmd.date, &cmd.start_time, &cmd.end_time)?,
            player_level: parse_level(&cmd.player_level)?,
            max_participants: cmd.max_participants,
            cost_per_person: cmd.cost_per_person,
            allow_cancellation: cmd.allow_cancellation,
            cancellation_deadline_hours: cmd.cancellation_deadline_hours,
            court_ids: parse_court_ids(&cmd.court_ids)?,
            rules: SessionRule::parse_all(cmd.rules)?,
        };
        let session = Session::new(SessionId::new(), fields)?;

        // 2. The venue must exist and be taking bookings
        let venue = self
            .venues
            .find_venue(venue_id)
            .await?
            .ok_or(SessionError::VenueNotFound(venue_id))?;
        if !venue.is_active() {
            return Err(SessionError::InvalidVenue {
                venue_id,
                status: venue.status,
            });
        }

        // 3. The window must fit the venue's hours for that date
        let now = Timestamp::now();
        validate_against_ranges(
            session.window(),
            &venue.operating_ranges,
            now.to_local_naive(),
            &self.limits,
        )?;

        // 4. Every court must be free
        for court_id in session.court_ids() {
            let existing = self
                .repository
                .list_by_court_and_date(*court_id, session.date())
                .await?;
            check_conflict(*court_id, session.window(), &existing, None)?;
        }

        // 5. Persist with the host's confirmed seat; the store re-checks courts
        let host = Participant::join(session.id(), cmd.user_id, ParticipantStatus::Confirmed, now);
        self.repository.create(&session, &host).await?;

        tracing::info!(
            session_id = %session.id(),
            host_id = %cmd.user_id,
            venue_id = %venue_id,
            date = %session.date(),
            "session created"
        );

        // 6. Publish
        let event = SessionCreated {
            event_id: EventId::new(),
            session_id: session.id(),
            session: SessionSnapshot::from(&session),
            created_at: session.created_at(),
        };
        self.event_publisher
            .publish(envelope(&event, &metadata)?)
            .await?;

        Ok(CreateSessionResult {
            detail: SessionDetail {
                session,
                participants: vec![host],
            },
            event,
        })
    }
}
