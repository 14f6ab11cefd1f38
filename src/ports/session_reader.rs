//! Session reader port (read side / CQRS queries).
//!
//! Listing and per-user queries. Kept apart from the repository so an
//! adapter can serve them from denormalized views.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, SessionStatus, UserId, VenueId};
use crate::domain::session::{PlayerLevel, Session};

/// Reader port for session queries.
#[async_trait]
pub trait SessionReader: Send + Sync {
    /// List sessions matching `filter`, ordered by date then start time.
    async fn list(&self, filter: &SessionFilter) -> Result<SessionPage, DomainError>;

    /// Sessions the user hosts or has a participant row in.
    ///
    /// With `since` set, only sessions dated on or after it are returned.
    /// Ordered by date then start time.
    async fn list_for_user(
        &self,
        user_id: UserId,
        since: Option<NaiveDate>,
    ) -> Result<Vec<SessionSummary>, DomainError>;
}

/// Filters for listing sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFilter {
    pub date: Option<NaiveDate>,
    pub venue_id: Option<VenueId>,
    pub player_level: Option<PlayerLevel>,
    pub status: Option<SessionStatus>,
    pub limit: u32,
    pub offset: u32,
}

impl SessionFilter {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 100;

    /// Page bounds, with the limit clamped to `1..=MAX_LIMIT`.
    pub fn paginated(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            date: None,
            venue_id: None,
            player_level: None,
            status: None,
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }

    /// Returns true if `session` passes every set filter.
    pub fn matches(&self, session: &Session) -> bool {
        self.date.map_or(true, |d| session.date() == d)
            && self.venue_id.map_or(true, |v| session.venue_id() == v)
            && self.player_level.map_or(true, |l| session.player_level() == l)
            && self.status.map_or(true, |s| session.status() == s)
    }
}

impl Default for SessionFilter {
    fn default() -> Self {
        Self::paginated(None, None)
    }
}

/// A session with its head counts, for lists.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub session: Session,
    pub confirmed_count: u32,
    pub pending_count: u32,
}

/// One page of sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPage {
    pub items: Vec<SessionSummary>,
    /// Total number of matching sessions across all pages.
    pub total: u64,
    pub has_more: bool,
}
