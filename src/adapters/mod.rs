//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - SQLx-backed session storage and venue lookup
//! - `memory` - In-process storage for tests and local runs
//! - `cache` - TTL cache in front of the venue directory
//! - `events` - Event publishers (in-memory capture, structured logs)
//! - `http` - axum routes over the application handlers

pub mod cache;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use cache::CachedVenueDirectory;
pub use events::{InMemoryEventBus, TracingEventPublisher};
pub use memory::{InMemorySessionStore, InMemoryVenueDirectory};
pub use postgres::{PostgresSessionReader, PostgresSessionRepository, PostgresVenueDirectory};
