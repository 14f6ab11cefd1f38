//! Session aggregate entity.
//!
//! A session is a scheduled group match on one or more courts of a venue,
//! hosted by one user and capped at `max_participants` confirmed players.
//!
//! # Ownership
//!
//! Sessions reference their venue and courts by ID only. Participants are
//! separate rows loaded alongside the session; see [`super::Participant`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{PlayerLevel, SessionRule, SessionWindow};
use crate::domain::foundation::{
    CourtId, DomainError, ErrorCode, SessionId, SessionStatus, StateMachine, Timestamp, UserId,
    VenueId,
};

/// Maximum length for session title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Smallest allowed capacity (the host plus one).
pub const MIN_PARTICIPANTS: u32 = 2;

/// Longest leave deadline a host may set: one year before the session date.
pub const MAX_CANCELLATION_DEADLINE_HOURS: u32 = 8760;

/// The host-editable attributes of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFields {
    pub host_id: UserId,
    pub venue_id: VenueId,
    pub title: String,
    pub description: Option<String>,
    pub window: SessionWindow,
    pub player_level: PlayerLevel,
    pub max_participants: u32,
    pub cost_per_person: f64,
    pub allow_cancellation: bool,
    pub cancellation_deadline_hours: Option<u32>,
    pub court_ids: Vec<CourtId>,
    pub rules: Vec<SessionRule>,
}

/// Session aggregate.
///
/// # Invariants
///
/// - `title` is 1-200 characters after trimming
/// - `max_participants >= 2`
/// - `cost_per_person` is finite and not negative
/// - `court_ids` is non-empty with no duplicates
/// - `cancellation_deadline_hours`, when set, is at most 8760
/// - Cancelled and completed sessions cannot be modified
/// - `version` increases by one on every persisted write
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    host_id: UserId,
    venue_id: VenueId,
    title: String,
    description: Option<String>,
    window: SessionWindow,
    player_level: PlayerLevel,
    max_participants: u32,
    cost_per_person: f64,
    allow_cancellation: bool,
    cancellation_deadline_hours: Option<u32>,
    status: SessionStatus,
    court_ids: Vec<CourtId>,
    rules: Vec<SessionRule>,
    created_at: Timestamp,
    updated_at: Timestamp,
    version: i64,
}

impl Session {
    /// Create a new open session.
    ///
    /// The window itself is validated separately against the venue; this
    /// only checks the field invariants.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if any field invariant is violated
    pub fn new(id: SessionId, fields: SessionFields) -> Result<Self, DomainError> {
        Self::validate_title(&fields.title)?;
        Self::validate_capacity(fields.max_participants)?;
        Self::validate_cost(fields.cost_per_person)?;
        Self::validate_courts(&fields.court_ids)?;
        Self::validate_deadline_hours(fields.cancellation_deadline_hours)?;

        let now = Timestamp::now();
        Ok(Self::reconstitute(
            id,
            SessionFields {
                title: fields.title.trim().to_string(),
                ..fields
            },
            SessionStatus::Open,
            now,
            now,
            0,
        ))
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        fields: SessionFields,
        status: SessionStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: i64,
    ) -> Self {
        Self {
            id,
            host_id: fields.host_id,
            venue_id: fields.venue_id,
            title: fields.title,
            description: fields.description,
            window: fields.window,
            player_level: fields.player_level,
            max_participants: fields.max_participants,
            cost_per_person: fields.cost_per_person,
            allow_cancellation: fields.allow_cancellation,
            cancellation_deadline_hours: fields.cancellation_deadline_hours,
            status,
            court_ids: fields.court_ids,
            rules: fields.rules,
            created_at,
            updated_at,
            version,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn host_id(&self) -> UserId {
        self.host_id
    }

    pub fn venue_id(&self) -> VenueId {
        self.venue_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn window(&self) -> &SessionWindow {
        &self.window
    }

    pub fn date(&self) -> NaiveDate {
        self.window.date()
    }

    pub fn start_time(&self) -> NaiveTime {
        self.window.start()
    }

    pub fn end_time(&self) -> NaiveTime {
        self.window.end()
    }

    pub fn player_level(&self) -> PlayerLevel {
        self.player_level
    }

    pub fn max_participants(&self) -> u32 {
        self.max_participants
    }

    pub fn cost_per_person(&self) -> f64 {
        self.cost_per_person
    }

    pub fn allow_cancellation(&self) -> bool {
        self.allow_cancellation
    }

    pub fn cancellation_deadline_hours(&self) -> Option<u32> {
        self.cancellation_deadline_hours
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn court_ids(&self) -> &[CourtId] {
        &self.court_ids
    }

    pub fn rules(&self) -> &[SessionRule] {
        &self.rules
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Version read from storage; the repository bumps it on write.
    pub fn version(&self) -> i64 {
        self.version
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_host(&self, user_id: UserId) -> bool {
        self.host_id == user_id
    }

    pub fn uses_court(&self, court_id: CourtId) -> bool {
        self.court_ids.contains(&court_id)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True once the session's start instant has been reached.
    pub fn has_started(&self, now: NaiveDateTime) -> bool {
        now >= self.window.starts_at()
    }

    /// Last instant at which a participant may still leave.
    ///
    /// Measured back from midnight at the start of the session date. A
    /// deadline before the earliest representable instant has always passed.
    pub fn leave_deadline(&self) -> Option<NaiveDateTime> {
        self.cancellation_deadline_hours.map(|hours| {
            self.window
                .date()
                .and_time(NaiveTime::MIN)
                .checked_sub_signed(Duration::hours(i64::from(hours)))
                .unwrap_or(NaiveDateTime::MIN)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Rename the session.
    pub fn rename(&mut self, title: String) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        Self::validate_title(&title)?;
        self.title = title.trim().to_string();
        self.touch();
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<String>) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        self.description = description;
        self.touch();
        Ok(())
    }

    pub fn set_player_level(&mut self, level: PlayerLevel) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        self.player_level = level;
        self.touch();
        Ok(())
    }

    pub fn set_cost_per_person(&mut self, cost: f64) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        Self::validate_cost(cost)?;
        self.cost_per_person = cost;
        self.touch();
        Ok(())
    }

    pub fn set_allow_cancellation(&mut self, allow: bool) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        self.allow_cancellation = allow;
        self.touch();
        Ok(())
    }

    pub fn set_cancellation_deadline_hours(&mut self, hours: Option<u32>) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        Self::validate_deadline_hours(hours)?;
        self.cancellation_deadline_hours = hours;
        self.touch();
        Ok(())
    }

    pub fn replace_rules(&mut self, rules: Vec<SessionRule>) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        self.rules = rules;
        self.touch();
        Ok(())
    }

    /// Change capacity. The caller keeps the open/full status in step via
    /// [`Session::sync_capacity`].
    pub fn set_max_participants(&mut self, max: u32) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        Self::validate_capacity(max)?;
        self.max_participants = max;
        self.touch();
        Ok(())
    }

    pub fn replace_courts(&mut self, court_ids: Vec<CourtId>) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        Self::validate_courts(&court_ids)?;
        self.court_ids = court_ids;
        self.touch();
        Ok(())
    }

    /// Brings open/full in line with the confirmed head count.
    ///
    /// Returns the new status if it changed.
    pub fn sync_capacity(&mut self, confirmed: usize) -> Result<Option<SessionStatus>, DomainError> {
        let at_capacity = confirmed >= self.max_participants as usize;
        let target = match (self.status, at_capacity) {
            (SessionStatus::Open, true) => SessionStatus::Full,
            (SessionStatus::Full, false) => SessionStatus::Open,
            _ => return Ok(None),
        };

        self.status = self.status.transition_to(target)?;
        self.touch();
        Ok(Some(target))
    }

    /// Cancel the session.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already cancelled or completed
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SessionStatus::Cancelled)?;
        self.touch();
        Ok(())
    }

    /// Mark the session as played.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already cancelled or completed
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SessionStatus::Completed)?;
        self.touch();
        Ok(())
    }

    /// Returns this session stamped with a new storage version.
    ///
    /// Repositories call this after a successful compare-and-swap.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.is_terminal() {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot modify a {} session", self.status),
            )
            .with_detail("status", self.status.as_str()))
        } else {
            Ok(())
        }
    }

    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("Title must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }

    fn validate_capacity(max: u32) -> Result<(), DomainError> {
        if max < MIN_PARTICIPANTS {
            return Err(DomainError::validation(
                "max_participants",
                format!("Must allow at least {} participants", MIN_PARTICIPANTS),
            ));
        }
        Ok(())
    }

    fn validate_cost(cost: f64) -> Result<(), DomainError> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(DomainError::validation(
                "cost_per_person",
                "Cost must be a non-negative amount",
            ));
        }
        Ok(())
    }

    fn validate_deadline_hours(hours: Option<u32>) -> Result<(), DomainError> {
        match hours {
            Some(h) if h > MAX_CANCELLATION_DEADLINE_HOURS => Err(DomainError::validation(
                "cancellation_deadline_hours",
                format!(
                    "Deadline must be at most {} hours before the session",
                    MAX_CANCELLATION_DEADLINE_HOURS
                ),
            )),
            _ => Ok(()),
        }
    }

    fn validate_courts(court_ids: &[CourtId]) -> Result<(), DomainError> {
        if court_ids.is_empty() {
            return Err(DomainError::validation("court_ids", "At least one court is required"));
        }
        let mut seen = std::collections::HashSet::with_capacity(court_ids.len());
        if !court_ids.iter().all(|id| seen.insert(*id)) {
            return Err(DomainError::validation("court_ids", "Courts must not repeat"));
        }
        Ok(())
    }
}

/// Serialized form used by event payloads and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub host_id: UserId,
    pub venue_id: VenueId,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SessionStatus,
    pub max_participants: u32,
    pub court_ids: Vec<CourtId>,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            host_id: session.host_id,
            venue_id: session.venue_id,
            title: session.title.clone(),
            date: session.date(),
            start_time: session.start_time(),
            end_time: session.end_time(),
            status: session.status,
            max_participants: session.max_participants,
            court_ids: session.court_ids.clone(),
        }
    }
}
