//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, command handlers write through `SessionRepository` while
//! list queries go through `SessionReader`.

pub mod handlers;

pub use handlers::session;
