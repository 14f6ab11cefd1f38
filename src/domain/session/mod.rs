//! Session module - play sessions and their participant lifecycle.
//!
//! # Module Organization
//!
//! - `aggregate` - The `Session` entity and its field invariants
//! - `participant` - Participant rows and their status transitions
//! - `schedule` - Time windows and venue-hours validation
//! - `conflict` - Court double-booking detection
//! - `roster` - Read-side helpers over a participant list
//! - `lifecycle` - Join/leave/cancel/update decisions producing a `SessionWrite`
//! - `events` - Domain events published after a successful write

mod aggregate;
mod conflict;
mod errors;
mod events;
mod lifecycle;
mod participant;
mod player_level;
mod roster;
mod rules;
mod schedule;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{
    Session, SessionFields, SessionSnapshot, MAX_CANCELLATION_DEADLINE_HOURS, MAX_TITLE_LENGTH,
    MIN_PARTICIPANTS,
};
pub use conflict::{check_conflict, CourtBooked};
pub use errors::{ErrorCategory, SessionError};
pub use events::{
    ParticipantJoined, ParticipantLeft, SessionCancelled, SessionCreated, SessionStatusChanged,
    SessionUpdated,
};
pub use lifecycle::{
    plan_cancel, plan_join, plan_leave, plan_update, CancelPlan, JoinPlan, LeavePlan,
    ParticipantUpdate, SessionChanges, SessionWrite, UpdatePlan,
};
pub use participant::Participant;
pub use player_level::PlayerLevel;
pub use roster::{ParticipantRoster, RosterCounts};
pub use rules::{SessionRule, MAX_RULE_LENGTH};
pub use schedule::{
    validate_against_ranges, validate_window, ScheduleLimits, SessionWindow, WindowError,
};
