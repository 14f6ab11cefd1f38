//! Read-side helpers over a session's participant list.

use crate::domain::foundation::{ParticipantStatus, UserId};

use super::Participant;

/// Confirmed and pending head counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterCounts {
    pub confirmed: usize,
    pub pending: usize,
}

/// A borrowed view over the participants of one session.
///
/// Participants are expected in insertion order; `first_pending` relies on
/// it to break ties between equal `joined_at` values.
#[derive(Debug, Clone, Copy)]
pub struct ParticipantRoster<'a> {
    participants: &'a [Participant],
}

impl<'a> ParticipantRoster<'a> {
    pub fn new(participants: &'a [Participant]) -> Self {
        Self { participants }
    }

    pub fn counts(&self) -> RosterCounts {
        self.participants
            .iter()
            .fold(RosterCounts::default(), |mut counts, p| {
                match p.status() {
                    ParticipantStatus::Confirmed => counts.confirmed += 1,
                    ParticipantStatus::Pending => counts.pending += 1,
                    ParticipantStatus::Cancelled => {}
                }
                counts
            })
    }

    /// The user's row, whatever its status.
    pub fn find(&self, user_id: UserId) -> Option<&'a Participant> {
        self.participants.iter().find(|p| p.user_id() == user_id)
    }

    /// The user's row if it is not cancelled.
    pub fn active(&self, user_id: UserId) -> Option<&'a Participant> {
        self.participants
            .iter()
            .find(|p| p.user_id() == user_id && p.status().is_active())
    }

    /// The pending participant who joined earliest; the first one wins a tie.
    pub fn first_pending(&self) -> Option<&'a Participant> {
        let mut earliest: Option<&'a Participant> = None;
        for p in self.participants.iter().filter(|p| p.is_pending()) {
            match earliest {
                Some(current) if current.joined_at() <= p.joined_at() => {}
                _ => earliest = Some(p),
            }
        }
        earliest
    }

    /// Pending participants in promotion order.
    pub fn pending_in_order(&self) -> Vec<&'a Participant> {
        let mut pending: Vec<&'a Participant> =
            self.participants.iter().filter(|p| p.is_pending()).collect();
        // Stable sort keeps insertion order for equal timestamps.
        pending.sort_by_key(|p| p.joined_at());
        pending
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Participant> + 'a {
        self.participants.iter()
    }
}
