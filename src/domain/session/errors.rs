//! Session-specific error types.

use chrono::{NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::{CourtBooked, WindowError};
use crate::domain::foundation::{
    CourtId, DomainError, ErrorCode, SessionId, SessionStatus, StateMachine, ValidationError,
    VenueId,
};
use crate::domain::venue::VenueStatus;

/// Broad classes of session failure. Delivery layers map these to
/// transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Policy,
    NotFound,
    Unauthorized,
    Conflict,
    Infrastructure,
}

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    CourtBooked(#[from] CourtBooked),

    #[error("Venue {venue_id} is {status} and not accepting sessions")]
    InvalidVenue { venue_id: VenueId, status: VenueStatus },

    #[error("Session is {0} and cannot be joined")]
    NotJoinable(SessionStatus),

    #[error("Session has already started")]
    AlreadyStarted,

    #[error("User has already joined this session")]
    AlreadyJoined,

    #[error("User previously left this session and cannot rejoin")]
    PreviouslyCancelled,

    #[error("Host cannot leave their own session")]
    HostCannotLeave,

    #[error("This session does not allow cancellation")]
    CancellationNotAllowed,

    #[error("Cancellation deadline passed at {deadline}")]
    DeadlinePassed { deadline: NaiveDateTime },

    #[error("User is not participating in this session")]
    NotParticipating,

    #[error("Session is already {0}")]
    AlreadyTerminal(SessionStatus),

    #[error("Invalid status change: {0}")]
    InvalidTransition(String),

    #[error("Cannot lower capacity to {requested}: {confirmed} participants are confirmed")]
    ParticipantLimitViolation { requested: u32, confirmed: usize },

    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Venue not found: {0}")]
    VenueNotFound(VenueId),

    #[error("Only the host can perform this action")]
    Unauthorized,

    #[error("Session changed concurrently, please retry")]
    Conflict,

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl SessionError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        use SessionError::*;
        match self {
            Validation { .. } => ErrorCategory::Validation,
            NotFound(_) | VenueNotFound(_) => ErrorCategory::NotFound,
            Unauthorized => ErrorCategory::Unauthorized,
            Conflict => ErrorCategory::Conflict,
            Infrastructure(_) => ErrorCategory::Infrastructure,
            Window(_)
            | CourtBooked(_)
            | InvalidVenue { .. }
            | NotJoinable(_)
            | AlreadyStarted
            | AlreadyJoined
            | PreviouslyCancelled
            | HostCannotLeave
            | CancellationNotAllowed
            | DeadlinePassed { .. }
            | NotParticipating
            | AlreadyTerminal(_)
            | InvalidTransition(_)
            | ParticipantLimitViolation { .. } => ErrorCategory::Policy,
        }
    }

    /// Stable machine-readable reason for clients.
    pub fn reason(&self) -> &'static str {
        use SessionError::*;
        match self {
            Validation { .. } => "validation_failed",
            Window(err) => err.reason(),
            CourtBooked(_) => "court_booked",
            InvalidVenue { .. } => "invalid_venue",
            NotJoinable(_) => "not_joinable",
            AlreadyStarted => "already_started",
            AlreadyJoined => "already_joined",
            PreviouslyCancelled => "previously_cancelled",
            HostCannotLeave => "host_cannot_leave",
            CancellationNotAllowed => "cancellation_not_allowed",
            DeadlinePassed { .. } => "deadline_passed",
            NotParticipating => "not_participating",
            AlreadyTerminal(_) => "already_terminal",
            InvalidTransition(_) => "invalid_state_transition",
            ParticipantLimitViolation { .. } => "participant_limit_violation",
            NotFound(_) => "session_not_found",
            VenueNotFound(_) => "venue_not_found",
            Unauthorized => "unauthorized",
            Conflict => "conflict",
            Infrastructure(_) => "internal_error",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Conflict)
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => SessionError::Validation {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            ErrorCode::SessionNotFound => match err.detail("session_id").map(str::parse) {
                Some(Ok(id)) => SessionError::NotFound(id),
                _ => SessionError::Infrastructure(err.to_string()),
            },
            ErrorCode::VenueNotFound => match err.detail("venue_id").map(str::parse) {
                Some(Ok(id)) => SessionError::VenueNotFound(id),
                _ => SessionError::Infrastructure(err.to_string()),
            },
            ErrorCode::CourtBooked => court_booked_from_details(&err)
                .map(SessionError::CourtBooked)
                .unwrap_or_else(|| SessionError::Infrastructure(err.to_string())),
            ErrorCode::ConcurrencyConflict => SessionError::Conflict,
            ErrorCode::Forbidden => SessionError::Unauthorized,
            ErrorCode::InvalidStateTransition => match terminal_status(&err) {
                Some(status) => SessionError::AlreadyTerminal(status),
                None => SessionError::InvalidTransition(err.message),
            },
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}

/// The terminal session status behind a rejected transition. Aggregate
/// guards report it as `status`, the state machine as a Debug-cased `from`.
fn terminal_status(err: &DomainError) -> Option<SessionStatus> {
    let raw = err.detail("status").or_else(|| err.detail("from"))?;
    let status: SessionStatus = raw.to_lowercase().parse().ok()?;
    status.is_terminal().then_some(status)
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Adapters report a lost court race as a `CourtBooked` domain error with
/// `court_id`, `session_id`, `start` and `end` details.
fn court_booked_from_details(err: &DomainError) -> Option<CourtBooked> {
    let court_id: CourtId = err.detail("court_id")?.parse().ok()?;
    let session_id: SessionId = err.detail("session_id")?.parse().ok()?;
    let start = NaiveTime::parse_from_str(err.detail("start")?, "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(err.detail("end")?, "%H:%M").ok()?;
    Some(CourtBooked {
        court_id,
        session_id,
        start,
        end,
    })
}

impl From<CourtBooked> for DomainError {
    fn from(booked: CourtBooked) -> Self {
        DomainError::new(ErrorCode::CourtBooked, booked.to_string())
            .with_detail("court_id", booked.court_id.to_string())
            .with_detail("session_id", booked.session_id.to_string())
            .with_detail("start", booked.start.format("%H:%M").to_string())
            .with_detail("end", booked.end.format("%H:%M").to_string())
    }
}
