//! Short-TTL venue cache using moka.
//!
//! Venue status and hours change rarely, while every session create looks
//! a venue up. Found venues are cached for a configurable TTL; misses are
//! not cached so a newly added venue is visible immediately.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{DomainError, VenueId};
use crate::domain::venue::Venue;
use crate::ports::VenueDirectory;

/// Default maximum cache capacity (number of venues).
const DEFAULT_MAX_CAPACITY: u64 = 1_000;

/// Wraps a [`VenueDirectory`] with an in-process TTL cache.
pub struct CachedVenueDirectory {
    inner: Arc<dyn VenueDirectory>,
    cache: Cache<VenueId, Venue>,
}

impl std::fmt::Debug for CachedVenueDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedVenueDirectory")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl CachedVenueDirectory {
    pub fn new(inner: Arc<dyn VenueDirectory>, ttl: Duration) -> Self {
        Self::with_capacity(inner, ttl, DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(inner: Arc<dyn VenueDirectory>, ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }

    /// Drops a venue from the cache.
    pub async fn invalidate(&self, id: VenueId) {
        self.cache.invalidate(&id).await;
    }
}

#[async_trait]
impl VenueDirectory for CachedVenueDirectory {
    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, DomainError> {
        if let Some(venue) = self.cache.get(&id).await {
            tracing::trace!(venue_id = %id, "venue cache hit");
            return Ok(Some(venue));
        }

        let venue = self.inner.find_venue(id).await?;
        if let Some(venue) = &venue {
            self.cache.insert(id, venue.clone()).await;
        }
        Ok(venue)
    }
}
