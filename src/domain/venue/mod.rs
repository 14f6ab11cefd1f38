//! Venue module - the read-only view of a venue that scheduling relies on.
//!
//! Venues are managed elsewhere; sessions only need their status and the
//! operating ranges that bound when a session may be held.

mod operating_range;
mod venue;

pub use operating_range::{OperatingDay, OperatingRange};
pub use venue::{Venue, VenueStatus};
