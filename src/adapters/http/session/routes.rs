//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_session, create_session, get_session, join_session, leave_session, list_my_sessions,
    list_sessions, update_session, SessionHandlers,
};

/// Creates the session router with all endpoints.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", post(create_session).get(list_sessions))
        .route("/mine", get(list_my_sessions))
        .route("/:id", get(get_session).patch(update_session))
        .route("/:id/join", post(join_session))
        .route("/:id/leave", post(leave_session))
        .route("/:id/cancel", post(cancel_session))
        .with_state(handlers)
}
