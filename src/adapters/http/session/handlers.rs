//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireUser;
use crate::application::handlers::session::{
    CancelSessionCommand, CancelSessionHandler, CreateSessionHandler, GetSessionHandler,
    GetSessionQuery, JoinSessionCommand, JoinSessionHandler, LeaveSessionCommand,
    LeaveSessionHandler, ListSessionsHandler, ListUserSessionsHandler, ListUserSessionsQuery,
    UpdateSessionHandler,
};
use crate::domain::foundation::{CommandMetadata, SessionId, UserId};
use crate::domain::session::{ErrorCategory, ScheduleLimits, SessionError};
use crate::ports::{EventPublisher, SessionReader, SessionRepository, VenueDirectory};

use super::dto::{
    CancelSessionResponse, CreateSessionRequest, ErrorResponse, ListSessionsParams,
    ParticipantResponse, ParticipationResponse, SessionDetailResponse, SessionListResponse,
    SessionResponse, SessionSummaryResponse, UpdateSessionRequest, UserSessionsParams,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    pub create: Arc<CreateSessionHandler>,
    pub get: Arc<GetSessionHandler>,
    pub update: Arc<UpdateSessionHandler>,
    pub list: Arc<ListSessionsHandler>,
    pub list_for_user: Arc<ListUserSessionsHandler>,
    pub join: Arc<JoinSessionHandler>,
    pub leave: Arc<LeaveSessionHandler>,
    pub cancel: Arc<CancelSessionHandler>,
}

impl SessionHandlers {
    /// Wires every session handler over the given ports.
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        reader: Arc<dyn SessionReader>,
        venues: Arc<dyn VenueDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
        limits: ScheduleLimits,
    ) -> Self {
        Self {
            create: Arc::new(CreateSessionHandler::new(
                repository.clone(),
                venues,
                event_publisher.clone(),
                limits,
            )),
            get: Arc::new(GetSessionHandler::new(repository.clone())),
            update: Arc::new(UpdateSessionHandler::new(
                repository.clone(),
                event_publisher.clone(),
            )),
            list: Arc::new(ListSessionsHandler::new(reader.clone())),
            list_for_user: Arc::new(ListUserSessionsHandler::new(reader)),
            join: Arc::new(JoinSessionHandler::new(
                repository.clone(),
                event_publisher.clone(),
            )),
            leave: Arc::new(LeaveSessionHandler::new(
                repository.clone(),
                event_publisher.clone(),
            )),
            cancel: Arc::new(CancelSessionHandler::new(repository, event_publisher)),
        }
    }
}

fn metadata(user_id: UserId) -> CommandMetadata {
    CommandMetadata::new(user_id).with_source("http")
}

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Create a new session
pub async fn create_session(
    State(handlers): State<SessionHandlers>,
    RequireUser(user_id): RequireUser,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    match handlers
        .create
        .handle(req.into_command(user_id), metadata(user_id))
        .await
    {
        Ok(result) => (
            StatusCode::CREATED,
            Json(SessionDetailResponse::from(&result.detail)),
        )
            .into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/sessions/:id - Get session details with participants
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get.handle(GetSessionQuery { session_id }).await {
        Ok(detail) => (StatusCode::OK, Json(SessionDetailResponse::from(&detail))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/sessions - List sessions with filters
pub async fn list_sessions(
    State(handlers): State<SessionHandlers>,
    Query(params): Query<ListSessionsParams>,
) -> Response {
    match handlers.list.handle(params.into()).await {
        Ok(page) => (StatusCode::OK, Json(SessionListResponse::from(page))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/sessions/mine - Sessions the caller hosts or has joined
pub async fn list_my_sessions(
    State(handlers): State<SessionHandlers>,
    RequireUser(user_id): RequireUser,
    Query(params): Query<UserSessionsParams>,
) -> Response {
    let query = ListUserSessionsQuery {
        user_id,
        include_history: params.include_history,
    };

    match handlers.list_for_user.handle(query).await {
        Ok(sessions) => {
            let items: Vec<SessionSummaryResponse> = sessions.iter().map(Into::into).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// PATCH /api/sessions/:id - Host edits a session
pub async fn update_session(
    State(handlers): State<SessionHandlers>,
    RequireUser(user_id): RequireUser,
    Path(session_id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .update
        .handle(req.into_command(session_id, user_id), metadata(user_id))
        .await
    {
        Ok(result) => (StatusCode::OK, Json(SessionResponse::from(&result.session))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:id/join - Take a seat or a waitlist spot
pub async fn join_session(
    State(handlers): State<SessionHandlers>,
    RequireUser(user_id): RequireUser,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = JoinSessionCommand {
        session_id,
        user_id,
    };
    match handlers.join.handle(cmd, metadata(user_id)).await {
        Ok(result) => {
            let response = ParticipationResponse {
                session_id: session_id.to_string(),
                session_status: result.session.status(),
                participant: ParticipantResponse::from(&result.participant),
                promoted_user_id: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:id/leave - Give up a seat or waitlist spot
pub async fn leave_session(
    State(handlers): State<SessionHandlers>,
    RequireUser(user_id): RequireUser,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = LeaveSessionCommand {
        session_id,
        user_id,
    };
    match handlers.leave.handle(cmd, metadata(user_id)).await {
        Ok(result) => {
            let response = ParticipationResponse {
                session_id: session_id.to_string(),
                session_status: result.session.status(),
                participant: ParticipantResponse::from(&result.left),
                promoted_user_id: result.promoted.map(|p| p.user_id().to_string()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:id/cancel - Host cancels a session
pub async fn cancel_session(
    State(handlers): State<SessionHandlers>,
    RequireUser(user_id): RequireUser,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = CancelSessionCommand {
        session_id,
        user_id,
    };
    match handlers.cancel.handle(cmd, metadata(user_id)).await {
        Ok(result) => {
            let response = CancelSessionResponse {
                session_id: session_id.to_string(),
                status: result.session.status(),
                participants_cancelled: result.event.participants_cancelled,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        ErrorCategory::Policy => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Unauthorized => StatusCode::FORBIDDEN,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_session_error(error: SessionError) -> Response {
    let status = status_for(error.category());
    if status.is_server_error() {
        tracing::error!(error = %error, "session request failed");
    } else {
        tracing::debug!(reason = error.reason(), "session request rejected");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}
