//! Venue directory port - read-only venue lookup.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, VenueId};
use crate::domain::venue::Venue;

/// Looks up venues with their status and decoded operating ranges.
#[async_trait]
pub trait VenueDirectory: Send + Sync {
    /// Returns `None` if the venue does not exist.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on lookup failure, or if the stored operating
    ///   ranges cannot be decoded
    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, DomainError>;
}
