//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CancelSessionResponse, CreateSessionRequest, ErrorResponse, ListSessionsParams,
    ParticipantResponse, ParticipationResponse, SessionDetailResponse, SessionListResponse,
    SessionResponse, SessionSummaryResponse, UpdateSessionRequest, UserSessionsParams,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
