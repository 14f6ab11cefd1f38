//! In-memory adapters for tests and local runs.
//!
//! - `InMemorySessionStore` - `SessionRepository` + `SessionReader` over a
//!   single lock, so every write is trivially atomic
//! - `InMemoryVenueDirectory` - `VenueDirectory` over a map

mod session_store;
mod venue_directory;

pub use session_store::InMemorySessionStore;
pub use venue_directory::InMemoryVenueDirectory;
