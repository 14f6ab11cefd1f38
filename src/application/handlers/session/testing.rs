//! Fixtures shared by the session handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};

use super::CreateSessionCommand;
use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::{InMemorySessionStore, InMemoryVenueDirectory};
use crate::domain::foundation::{
    format_date, CommandMetadata, CourtId, DomainError, ErrorCode, ParticipantStatus, SessionId,
    Timestamp, UserId, VenueId,
};
use crate::domain::session::test_support::{future_date, t};
use crate::domain::session::{Participant, ScheduleLimits, Session};
use crate::domain::venue::{OperatingDay, OperatingRange, Venue, VenueStatus};
use crate::ports::{SessionDetail, SessionRepository, SessionWrite};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// An active venue open 08:00-22:00 every day.
pub fn venue() -> Venue {
    Venue {
        id: VenueId::new(),
        name: "Smash Hall".to_string(),
        location: "Bangkok".to_string(),
        status: VenueStatus::Active,
        operating_ranges: WEEK
            .iter()
            .map(|day| OperatingRange::new(OperatingDay::Weekday(*day), true, t(8, 0), t(22, 0)))
            .collect(),
    }
}

pub fn metadata(user_id: UserId) -> CommandMetadata {
    CommandMetadata::new(user_id).with_correlation_id("test-correlation")
}

pub fn create_command(
    host: UserId,
    venue_id: VenueId,
    court: CourtId,
    start: &str,
    end: &str,
) -> CreateSessionCommand {
    create_command_on(host, venue_id, court, future_date(), start, end)
}

pub fn create_command_on(
    host: UserId,
    venue_id: VenueId,
    court: CourtId,
    date: NaiveDate,
    start: &str,
    end: &str,
) -> CreateSessionCommand {
    CreateSessionCommand {
        user_id: host,
        venue_id: venue_id.to_string(),
        title: "Friday doubles".to_string(),
        description: Some("Bring your own shuttles".to_string()),
        date: format_date(date),
        start_time: start.to_string(),
        end_time: end.to_string(),
        player_level: "intermediate".to_string(),
        max_participants: 4,
        cost_per_person: 150.0,
        allow_cancellation: true,
        cancellation_deadline_hours: None,
        court_ids: vec![court.to_string()],
        rules: vec!["Non-marking shoes only".to_string()],
    }
}

/// In-memory adapters wired the way `main` wires the real ones.
pub struct Harness {
    pub store: Arc<InMemorySessionStore>,
    pub venues: Arc<InMemoryVenueDirectory>,
    pub events: Arc<InMemoryEventBus>,
    pub venue: Venue,
    pub court: CourtId,
    pub host: UserId,
}

impl Harness {
    pub async fn new() -> Self {
        let venues = Arc::new(InMemoryVenueDirectory::new());
        let venue = venue();
        venues.insert(venue.clone()).await;
        Self {
            store: Arc::new(InMemorySessionStore::new()),
            venues,
            events: Arc::new(InMemoryEventBus::new()),
            venue,
            court: CourtId::new(),
            host: UserId::new(),
        }
    }

    pub fn create_handler(&self) -> super::CreateSessionHandler {
        super::CreateSessionHandler::new(
            self.store.clone(),
            self.venues.clone(),
            self.events.clone(),
            ScheduleLimits::default(),
        )
    }

    /// Creates a session on the harness court, 18:00-20:00 a week out.
    pub async fn seed_session(&self, max_participants: u32) -> Session {
        let mut cmd = create_command(self.host, self.venue.id, self.court, "18:00", "20:00");
        cmd.max_participants = max_participants;
        let result = self
            .create_handler()
            .handle(cmd, metadata(self.host))
            .await
            .unwrap();
        self.events.clear();
        result.detail.session
    }

    pub async fn detail(&self, id: SessionId) -> SessionDetail {
        self.store.find_by_id(id).await.unwrap().unwrap()
    }
}

/// Wraps a repository and fails the first `conflicts` applies with a
/// version conflict.
pub struct ConflictingRepository {
    inner: Arc<dyn SessionRepository>,
    conflicts: usize,
    applies: AtomicUsize,
}

impl ConflictingRepository {
    pub fn new(inner: Arc<dyn SessionRepository>, conflicts: usize) -> Self {
        Self {
            inner,
            conflicts,
            applies: AtomicUsize::new(0),
        }
    }

    pub fn apply_calls(&self) -> usize {
        self.applies.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionRepository for ConflictingRepository {
    async fn find_by_id(&self, id: SessionId) -> Result<Option<SessionDetail>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn participants(&self, id: SessionId) -> Result<Vec<Participant>, DomainError> {
        self.inner.participants(id).await
    }

    async fn list_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> Result<Vec<Session>, DomainError> {
        self.inner.list_by_court_and_date(court_id, date).await
    }

    async fn create(&self, session: &Session, host: &Participant) -> Result<(), DomainError> {
        self.inner.create(session, host).await
    }

    async fn apply(&self, write: &SessionWrite) -> Result<Session, DomainError> {
        if self.applies.fetch_add(1, Ordering::SeqCst) < self.conflicts {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                "Simulated version conflict",
            ));
        }
        self.inner.apply(write).await
    }
}

/// Wraps a repository and creates `rival` right before the first apply
/// reaches the store, the way a concurrent create can land between an
/// update's conflict check and its write.
pub struct RacingRepository {
    inner: Arc<dyn SessionRepository>,
    rival: Mutex<Option<(Session, Participant)>>,
}

impl RacingRepository {
    pub fn new(inner: Arc<dyn SessionRepository>, rival: Session) -> Self {
        let host = Participant::join(
            rival.id(),
            rival.host_id(),
            ParticipantStatus::Confirmed,
            Timestamp::now(),
        );
        Self {
            inner,
            rival: Mutex::new(Some((rival, host))),
        }
    }
}

#[async_trait]
impl SessionRepository for RacingRepository {
    async fn find_by_id(&self, id: SessionId) -> Result<Option<SessionDetail>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn participants(&self, id: SessionId) -> Result<Vec<Participant>, DomainError> {
        self.inner.participants(id).await
    }

    async fn list_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> Result<Vec<Session>, DomainError> {
        self.inner.list_by_court_and_date(court_id, date).await
    }

    async fn create(&self, session: &Session, host: &Participant) -> Result<(), DomainError> {
        self.inner.create(session, host).await
    }

    async fn apply(&self, write: &SessionWrite) -> Result<Session, DomainError> {
        let rival = self
            .rival
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some((session, host)) = rival {
            self.inner.create(&session, &host).await?;
        }
        self.inner.apply(write).await
    }
}

/// A repository whose every call fails.
pub struct FailingRepository;

#[async_trait]
impl SessionRepository for FailingRepository {
    async fn find_by_id(&self, _id: SessionId) -> Result<Option<SessionDetail>, DomainError> {
        Err(DomainError::new(ErrorCode::DatabaseError, "Simulated failure"))
    }

    async fn participants(&self, _id: SessionId) -> Result<Vec<Participant>, DomainError> {
        Err(DomainError::new(ErrorCode::DatabaseError, "Simulated failure"))
    }

    async fn list_by_court_and_date(
        &self,
        _court_id: CourtId,
        _date: NaiveDate,
    ) -> Result<Vec<Session>, DomainError> {
        Err(DomainError::new(ErrorCode::DatabaseError, "Simulated failure"))
    }

    async fn create(&self, _session: &Session, _host: &Participant) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::DatabaseError, "Simulated failure"))
    }

    async fn apply(&self, _write: &SessionWrite) -> Result<Session, DomainError> {
        Err(DomainError::new(ErrorCode::DatabaseError, "Simulated failure"))
    }
}
