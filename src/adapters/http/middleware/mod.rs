//! HTTP middleware for axum.
//!
//! This module contains extractors for cross-cutting concerns:
//!
//! - `auth` - Caller identity forwarded by the gateway

pub mod auth;

pub use auth::{AuthRejection, RequireUser, USER_ID_HEADER};
