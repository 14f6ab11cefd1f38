//! HTTP adapters - REST API implementations.
//!
//! - `session` - Session endpoints under `/api/sessions`
//! - `middleware` - Caller identity extraction

pub mod middleware;
pub mod session;

use axum::{routing::get, Router};

pub use session::{session_routes, ErrorResponse, SessionHandlers};

/// The full API: session routes plus a liveness probe.
///
/// Cross-cutting layers (tracing, CORS, timeouts) are added by the binary.
pub fn api_router(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/sessions", session_routes(handlers))
}
