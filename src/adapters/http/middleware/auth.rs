//! Caller identity extractors for axum.
//!
//! Token validation happens at the gateway in front of this service, which
//! forwards the authenticated user's ID in the `X-User-Id` header.
//!
//! ```text
//! Gateway (validates token) → X-User-Id: <uuid> → RequireUser extractor → handler
//! ```
//!
//! # Example
//!
//! ```ignore
//! async fn my_handler(RequireUser(user_id): RequireUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user_id)
//! }
//! ```

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::UserId;

/// Header carrying the authenticated user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that requires a caller identity.
///
/// Rejects with 401 when the header is missing or not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AuthRejection::Unauthenticated)?
            .to_str()
            .map_err(|_| AuthRejection::MalformedUserId)?;

        raw.trim()
            .parse::<UserId>()
            .map(RequireUser)
            .map_err(|_| AuthRejection::MalformedUserId)
    }
}

/// Rejection type for identity failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No user header was provided.
    Unauthenticated,
    /// The user header is not a valid UUID.
    MalformedUserId,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            AuthRejection::Unauthenticated => "Authentication required",
            AuthRejection::MalformedUserId => "Invalid user identity",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "code": "UNAUTHENTICATED",
                "message": message,
            })),
        )
            .into_response()
    }
}
