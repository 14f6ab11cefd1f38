//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.
//! Dates travel as `YYYY-MM-DD`, times of day as `HH:MM` and timestamps as RFC 3339.

use serde::{Deserialize, Serialize};

use crate::application::handlers::session::{
    CreateSessionCommand, ListSessionsQuery, UpdateSessionCommand,
};
use crate::domain::foundation::{
    format_date, format_time, ParticipantStatus, SessionId, SessionStatus, UserId,
};
use crate::domain::session::{
    CourtBooked, ErrorCategory, Participant, PlayerLevel, Session, SessionError,
};
use crate::ports::{SessionDetail, SessionPage, SessionSummary};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub venue_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub player_level: String,
    pub max_participants: u32,
    #[serde(default)]
    pub cost_per_person: f64,
    #[serde(default = "default_allow_cancellation")]
    pub allow_cancellation: bool,
    #[serde(default)]
    pub cancellation_deadline_hours: Option<u32>,
    pub court_ids: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
}

fn default_allow_cancellation() -> bool {
    true
}

impl CreateSessionRequest {
    pub fn into_command(self, user_id: UserId) -> CreateSessionCommand {
        CreateSessionCommand {
            user_id,
            venue_id: self.venue_id,
            title: self.title,
            description: self.description,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            player_level: self.player_level,
            max_participants: self.max_participants,
            cost_per_person: self.cost_per_person,
            allow_cancellation: self.allow_cancellation,
            cancellation_deadline_hours: self.cancellation_deadline_hours,
            court_ids: self.court_ids,
            rules: self.rules,
        }
    }
}

/// Request to edit a session. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSessionRequest {
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

impl UpdateSessionRequest {
    pub fn into_command(self, session_id: SessionId, user_id: UserId) -> UpdateSessionCommand {
        UpdateSessionCommand {
            title: self.title,
            description: self.description,
            player_level: self.player_level,
            cost_per_person: self.cost_per_person,
            allow_cancellation: self.allow_cancellation,
            cancellation_deadline_hours: self.cancellation_deadline_hours,
            rules: self.rules,
            max_participants: self.max_participants,
            court_ids: self.court_ids,
            ..UpdateSessionCommand::new(session_id, user_id)
        }
    }
}

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSessionsParams {
    pub date: Option<String>,
    pub venue_id: Option<String>,
    pub player_level: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<ListSessionsParams> for ListSessionsQuery {
    fn from(params: ListSessionsParams) -> Self {
        Self {
            date: params.date,
            venue_id: params.venue_id,
            player_level: params.player_level,
            status: params.status,
            limit: params.limit,
            offset: params.offset,
        }
    }
}

/// Query parameters for the caller's own sessions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSessionsParams {
    #[serde(default)]
    pub include_history: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Session fields as exposed over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub host_id: String,
    pub venue_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub player_level: PlayerLevel,
    pub max_participants: u32,
    pub cost_per_person: f64,
    pub allow_cancellation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_deadline_hours: Option<u32>,
    pub status: SessionStatus,
    pub court_ids: Vec<String>,
    pub rules: Vec<String>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            host_id: session.host_id().to_string(),
            venue_id: session.venue_id().to_string(),
            title: session.title().to_string(),
            description: session.description().map(str::to_string),
            date: format_date(session.date()),
            start_time: format_time(session.start_time()),
            end_time: format_time(session.end_time()),
            player_level: session.player_level(),
            max_participants: session.max_participants(),
            cost_per_person: session.cost_per_person(),
            allow_cancellation: session.allow_cancellation(),
            cancellation_deadline_hours: session.cancellation_deadline_hours(),
            status: session.status(),
            court_ids: session.court_ids().iter().map(ToString::to_string).collect(),
            rules: session.rules().iter().map(|r| r.as_str().to_string()).collect(),
            version: session.version(),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
        }
    }
}

/// One participant row.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub id: String,
    pub user_id: String,
    pub status: ParticipantStatus,
    pub joined_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
}

impl From<&Participant> for ParticipantResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id().to_string(),
            user_id: participant.user_id().to_string(),
            status: participant.status(),
            joined_at: participant.joined_at().to_rfc3339(),
            cancelled_at: participant.cancelled_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// A session with its full roster.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetailResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub confirmed_count: u32,
    pub pending_count: u32,
    pub participants: Vec<ParticipantResponse>,
}

impl From<&SessionDetail> for SessionDetailResponse {
    fn from(detail: &SessionDetail) -> Self {
        let count = |status: ParticipantStatus| {
            detail
                .participants
                .iter()
                .filter(|p| p.status() == status)
                .count() as u32
        };
        Self {
            session: SessionResponse::from(&detail.session),
            confirmed_count: count(ParticipantStatus::Confirmed),
            pending_count: count(ParticipantStatus::Pending),
            participants: detail.participants.iter().map(Into::into).collect(),
        }
    }
}

/// Session summary for list responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummaryResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub confirmed_count: u32,
    pub pending_count: u32,
}

impl From<&SessionSummary> for SessionSummaryResponse {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            session: SessionResponse::from(&summary.session),
            confirmed_count: summary.confirmed_count,
            pending_count: summary.pending_count,
        }
    }
}

/// Paginated list of sessions.
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub items: Vec<SessionSummaryResponse>,
    pub total: u64,
    pub has_more: bool,
}

impl From<SessionPage> for SessionListResponse {
    fn from(page: SessionPage) -> Self {
        Self {
            items: page.items.iter().map(Into::into).collect(),
            total: page.total,
            has_more: page.has_more,
        }
    }
}

/// Outcome of a join or leave.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipationResponse {
    pub session_id: String,
    pub session_status: SessionStatus,
    pub participant: ParticipantResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_user_id: Option<String>,
}

/// Outcome of a cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct CancelSessionResponse {
    pub session_id: String,
    pub status: SessionStatus,
    pub participants_cancelled: usize,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&SessionError> for ErrorResponse {
    fn from(error: &SessionError) -> Self {
        if error.category() == ErrorCategory::Infrastructure {
            // Storage details stay in the logs.
            return Self::internal("An internal error occurred");
        }

        let details = match error {
            SessionError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            SessionError::CourtBooked(CourtBooked {
                court_id,
                session_id,
                start,
                end,
            }) => Some(serde_json::json!({
                "court_id": court_id.to_string(),
                "session_id": session_id.to_string(),
                "start_time": format_time(*start),
                "end_time": format_time(*end),
            })),
            _ => None,
        };

        Self {
            code: error.reason().to_ascii_uppercase(),
            message: error.to_string(),
            details,
        }
    }
}
