//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresSessionRepository` - Transactional session writes with version checks
//! - `PostgresSessionReader` - Read-optimized session lists with head counts
//! - `PostgresVenueDirectory` - Venue lookup with decoded operating ranges

mod rows;
mod session_reader;
mod session_repository;
mod venue_directory;

pub use session_reader::PostgresSessionReader;
pub use session_repository::PostgresSessionRepository;
pub use venue_directory::PostgresVenueDirectory;
