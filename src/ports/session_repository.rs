//! Session repository port (write side).
//!
//! Defines the contract for persisting sessions together with their
//! participant rows.
//!
//! # Design
//!
//! - **Atomic writes**: a lifecycle action is one `SessionWrite`, applied
//!   all-or-nothing
//! - **Optimistic concurrency**: `apply` only succeeds if the stored version
//!   still matches the version the session was read at
//! - **No event publishing**: handlers publish after a successful write

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{CourtId, DomainError, SessionId};
use crate::domain::session::{Participant, Session};

pub use crate::domain::session::{ParticipantUpdate, SessionWrite};

/// A session with its participants, ordered by `joined_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetail {
    pub session: Session,
    pub participants: Vec<Participant>,
}

/// Repository port for session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session and its participants.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: SessionId) -> Result<Option<SessionDetail>, DomainError>;

    /// Participants of a session ordered by `joined_at`, ties in insertion order.
    async fn participants(&self, id: SessionId) -> Result<Vec<Participant>, DomainError>;

    /// All sessions on `court_id` on `date`, including cancelled ones.
    async fn list_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> Result<Vec<Session>, DomainError>;

    /// Store a new session and the host's participant row together.
    ///
    /// # Errors
    ///
    /// - `CourtBooked` if a live session on one of the courts overlaps the
    ///   new window (another create won the race)
    /// - `DatabaseError` on persistence failure
    async fn create(&self, session: &Session, host: &Participant) -> Result<(), DomainError>;

    /// Apply a lifecycle write atomically.
    ///
    /// Returns the stored session with its bumped version.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `ConcurrencyConflict` if the stored version differs from
    ///   `write.expected_version`
    /// - `DatabaseError` on persistence failure
    async fn apply(&self, write: &SessionWrite) -> Result<Session, DomainError>;
}
