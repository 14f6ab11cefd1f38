//! In-memory venue directory.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, VenueId};
use crate::domain::venue::Venue;
use crate::ports::VenueDirectory;

/// Venue lookup backed by a map, seeded with [`InMemoryVenueDirectory::insert`].
#[derive(Default)]
pub struct InMemoryVenueDirectory {
    venues: RwLock<HashMap<VenueId, Venue>>,
}

impl InMemoryVenueDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a venue.
    pub async fn insert(&self, venue: Venue) {
        self.venues.write().await.insert(venue.id, venue);
    }
}

#[async_trait]
impl VenueDirectory for InMemoryVenueDirectory {
    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, DomainError> {
        Ok(self.venues.read().await.get(&id).cloned())
    }
}
