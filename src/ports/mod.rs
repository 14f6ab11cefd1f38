//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionRepository` - Atomic, versioned session writes and core reads
//! - `SessionReader` - Listing and per-user queries
//! - `VenueDirectory` - Read-only venue lookup
//! - `EventPublisher` - Domain event fan-out after a write commits

mod event_publisher;
mod session_reader;
mod session_repository;
mod venue_directory;

pub use event_publisher::EventPublisher;
pub use session_reader::{SessionFilter, SessionPage, SessionReader, SessionSummary};
pub use session_repository::{ParticipantUpdate, SessionDetail, SessionRepository, SessionWrite};
pub use venue_directory::VenueDirectory;
