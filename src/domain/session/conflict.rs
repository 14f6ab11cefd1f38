//! Court double-booking detection.

use chrono::NaiveTime;
use thiserror::Error;

use super::{Session, SessionWindow};
use crate::domain::foundation::{format_time, CourtId, SessionId, SessionStatus};

/// The court is already held by another session during the proposed window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Court {court_id} is already booked from {} to {}", hhmm(.start), hhmm(.end))]
pub struct CourtBooked {
    pub court_id: CourtId,
    pub session_id: SessionId,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

fn hhmm(time: &NaiveTime) -> String {
    format_time(*time)
}

/// Checks `window` on `court_id` against `existing` sessions.
///
/// Cancelled sessions, sessions on other courts, and the session named by
/// `exclude` (the one being updated) are ignored. The first overlapping
/// session is reported.
pub fn check_conflict(
    court_id: CourtId,
    window: &SessionWindow,
    existing: &[Session],
    exclude: Option<SessionId>,
) -> Result<(), CourtBooked> {
    let clash = existing.iter().find(|other| {
        other.status() != SessionStatus::Cancelled
            && Some(other.id()) != exclude
            && other.uses_court(court_id)
            && other.window().overlaps(window)
    });

    match clash {
        Some(other) => Err(CourtBooked {
            court_id,
            session_id: other.id(),
            start: other.window().start(),
            end: other.window().end(),
        }),
        None => Ok(()),
    }
}
