//! Caching decorators over read-only ports.

mod venue_cache;

pub use venue_cache::CachedVenueDirectory;
