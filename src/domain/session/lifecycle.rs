//! Lifecycle decisions for join, leave, cancel and update.
//!
//! Each `plan_*` function takes the session and its participants as read
//! from storage, checks the rules for the action, and returns a
//! [`SessionWrite`] describing the full result. Nothing here touches
//! storage; the repository applies the write atomically, guarded by the
//! version the session was read at.

use crate::domain::foundation::{
    CourtId, ParticipantId, ParticipantStatus, SessionStatus, Timestamp, UserId,
};

use super::{Participant, ParticipantRoster, PlayerLevel, Session, SessionError, SessionRule};

/// A status change for an existing participant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantUpdate {
    pub participant_id: ParticipantId,
    pub status: ParticipantStatus,
    pub cancelled_at: Option<Timestamp>,
}

impl From<&Participant> for ParticipantUpdate {
    fn from(participant: &Participant) -> Self {
        Self {
            participant_id: participant.id(),
            status: participant.status(),
            cancelled_at: participant.cancelled_at(),
        }
    }
}

/// Everything one lifecycle action changes, applied as a unit.
///
/// `session` is the new state. The write only succeeds if the stored
/// version still equals `expected_version`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionWrite {
    pub session: Session,
    pub expected_version: i64,
    pub new_participants: Vec<Participant>,
    pub participant_updates: Vec<ParticipantUpdate>,
    /// The session moved onto new courts. Repositories must lock those
    /// courts and re-run the conflict check in the same transaction.
    pub recheck_courts: bool,
}

impl SessionWrite {
    fn new(session: Session) -> Self {
        let expected_version = session.version();
        Self {
            session,
            expected_version,
            new_participants: Vec::new(),
            participant_updates: Vec::new(),
            recheck_courts: false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Join
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct JoinPlan {
    pub write: SessionWrite,
    pub participant: Participant,
    pub status_change: Option<SessionStatus>,
}

/// Decide the outcome of `user_id` joining `session`.
///
/// The user gets a confirmed seat while one is free and a pending spot on
/// the waitlist otherwise. Taking the last seat fills the session.
pub fn plan_join(
    session: &Session,
    participants: &[Participant],
    user_id: UserId,
    now: Timestamp,
) -> Result<JoinPlan, SessionError> {
    if !session.status().is_joinable() {
        return Err(SessionError::NotJoinable(session.status()));
    }
    if session.has_started(now.to_local_naive()) {
        return Err(SessionError::AlreadyStarted);
    }

    let roster = ParticipantRoster::new(participants);
    if let Some(existing) = roster.find(user_id) {
        return Err(match existing.status() {
            ParticipantStatus::Cancelled => SessionError::PreviouslyCancelled,
            _ => SessionError::AlreadyJoined,
        });
    }

    let confirmed = roster.counts().confirmed;
    let status = if confirmed < session.max_participants() as usize {
        ParticipantStatus::Confirmed
    } else {
        ParticipantStatus::Pending
    };
    let participant = Participant::join(session.id(), user_id, status, now);

    let mut updated = session.clone();
    let status_change = if participant.is_confirmed() {
        updated.sync_capacity(confirmed + 1)?
    } else {
        None
    };

    let mut write = SessionWrite::new(updated);
    write.new_participants.push(participant.clone());

    Ok(JoinPlan {
        write,
        participant,
        status_change,
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Leave
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct LeavePlan {
    pub write: SessionWrite,
    pub left: Participant,
    pub promoted: Option<Participant>,
    pub status_change: Option<SessionStatus>,
}

/// Decide the outcome of `user_id` leaving `session`.
///
/// A confirmed leaver's seat goes to the earliest pending participant; with
/// nobody waiting, a full session reopens.
pub fn plan_leave(
    session: &Session,
    participants: &[Participant],
    user_id: UserId,
    now: Timestamp,
) -> Result<LeavePlan, SessionError> {
    if session.is_host(user_id) {
        return Err(SessionError::HostCannotLeave);
    }
    if !session.allow_cancellation() {
        return Err(SessionError::CancellationNotAllowed);
    }
    if let Some(deadline) = session.leave_deadline() {
        if now.to_local_naive() >= deadline {
            return Err(SessionError::DeadlinePassed { deadline });
        }
    }
    if session.is_terminal() {
        return Err(SessionError::AlreadyTerminal(session.status()));
    }

    let roster = ParticipantRoster::new(participants);
    let mut left = roster
        .active(user_id)
        .cloned()
        .ok_or(SessionError::NotParticipating)?;
    let was_confirmed = left.is_confirmed();
    left.cancel(now)?;

    let mut confirmed = roster.counts().confirmed;
    let mut promoted = None;
    if was_confirmed {
        confirmed -= 1;
        if let Some(next) = roster.first_pending() {
            let mut next = next.clone();
            next.promote()?;
            confirmed += 1;
            promoted = Some(next);
        }
    }

    let mut updated = session.clone();
    let status_change = updated.sync_capacity(confirmed)?;

    let mut write = SessionWrite::new(updated);
    write.participant_updates.push((&left).into());
    if let Some(p) = &promoted {
        write.participant_updates.push(p.into());
    }

    Ok(LeavePlan {
        write,
        left,
        promoted,
        status_change,
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Cancel
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct CancelPlan {
    pub write: SessionWrite,
    pub cancelled_participants: Vec<ParticipantId>,
}

/// Decide the outcome of the host cancelling `session`.
///
/// Every participant still holding a seat or a waitlist spot is cancelled.
pub fn plan_cancel(
    session: &Session,
    participants: &[Participant],
    caller: UserId,
    now: Timestamp,
) -> Result<CancelPlan, SessionError> {
    if !session.is_host(caller) {
        return Err(SessionError::Unauthorized);
    }
    if session.is_terminal() {
        return Err(SessionError::AlreadyTerminal(session.status()));
    }

    let mut updated = session.clone();
    updated.cancel()?;

    let mut write = SessionWrite::new(updated);
    let mut cancelled_participants = Vec::new();
    for participant in participants.iter().filter(|p| p.status().is_active()) {
        let mut participant = participant.clone();
        participant.cancel(now)?;
        cancelled_participants.push(participant.id());
        write.participant_updates.push((&participant).into());
    }

    Ok(CancelPlan {
        write,
        cancelled_participants,
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Update
// ════════════════════════════════════════════════════════════════════════════

/// Host edits; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub player_level: Option<PlayerLevel>,
    pub cost_per_person: Option<f64>,
    pub allow_cancellation: Option<bool>,
    pub cancellation_deadline_hours: Option<u32>,
    pub rules: Option<Vec<SessionRule>>,
    pub max_participants: Option<u32>,
    pub court_ids: Option<Vec<CourtId>>,
}

#[derive(Debug, Clone)]
pub struct UpdatePlan {
    pub write: SessionWrite,
    pub promoted: Vec<Participant>,
    pub status_change: Option<SessionStatus>,
    /// True if the court set changed; the caller must re-check conflicts.
    pub courts_changed: bool,
}

/// Decide the outcome of the host editing `session`.
///
/// Raising capacity promotes waitlisted participants in join order.
/// Lowering it below the confirmed head count is rejected.
pub fn plan_update(
    session: &Session,
    participants: &[Participant],
    caller: UserId,
    changes: SessionChanges,
    now: Timestamp,
) -> Result<UpdatePlan, SessionError> {
    if !session.is_host(caller) {
        return Err(SessionError::Unauthorized);
    }
    if session.is_terminal() {
        return Err(SessionError::AlreadyTerminal(session.status()));
    }
    if session.has_started(now.to_local_naive()) {
        return Err(SessionError::AlreadyStarted);
    }

    let roster = ParticipantRoster::new(participants);
    let mut confirmed = roster.counts().confirmed;
    let mut updated = session.clone();

    if let Some(title) = changes.title {
        updated.rename(title)?;
    }
    if let Some(description) = changes.description {
        updated.set_description(Some(description))?;
    }
    if let Some(level) = changes.player_level {
        updated.set_player_level(level)?;
    }
    if let Some(cost) = changes.cost_per_person {
        updated.set_cost_per_person(cost)?;
    }
    if let Some(allow) = changes.allow_cancellation {
        updated.set_allow_cancellation(allow)?;
    }
    if let Some(hours) = changes.cancellation_deadline_hours {
        updated.set_cancellation_deadline_hours(Some(hours))?;
    }
    if let Some(rules) = changes.rules {
        updated.replace_rules(rules)?;
    }

    let mut courts_changed = false;
    if let Some(court_ids) = changes.court_ids {
        courts_changed = !same_courts(session.court_ids(), &court_ids);
        updated.replace_courts(court_ids)?;
    }

    let mut promoted = Vec::new();
    if let Some(max) = changes.max_participants {
        if (max as usize) < confirmed {
            return Err(SessionError::ParticipantLimitViolation {
                requested: max,
                confirmed,
            });
        }
        updated.set_max_participants(max)?;

        for next in roster.pending_in_order() {
            if confirmed >= max as usize {
                break;
            }
            let mut next = next.clone();
            next.promote()?;
            confirmed += 1;
            promoted.push(next);
        }
    }

    let status_change = updated.sync_capacity(confirmed)?;

    let mut write = SessionWrite::new(updated);
    write.recheck_courts = courts_changed;
    write
        .participant_updates
        .extend(promoted.iter().map(ParticipantUpdate::from));

    Ok(UpdatePlan {
        write,
        promoted,
        status_change,
        courts_changed,
    })
}

fn same_courts(current: &[CourtId], requested: &[CourtId]) -> bool {
    current.len() == requested.len() && requested.iter().all(|id| current.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::session::test_support::{fields, hosted_session};
    use crate::domain::session::SessionFields;
    use chrono::Duration;

    /// Applies a write to the in-test copies the way a repository would.
    fn apply(write: &SessionWrite, participants: &mut Vec<Participant>) -> Session {
        for update in &write.participant_updates {
            if let Some(p) = participants
                .iter_mut()
                .find(|p| p.id() == update.participant_id)
            {
                *p = Participant::reconstitute(
                    p.id(),
                    p.session_id(),
                    p.user_id(),
                    update.status,
                    p.joined_at(),
                    update.cancelled_at,
                );
            }
        }
        participants.extend(write.new_participants.iter().cloned());
        write.session.clone()
    }

    fn join(session: &mut Session, participants: &mut Vec<Participant>, user: UserId) -> JoinPlan {
        let plan = plan_join(session, participants, user, Timestamp::now()).unwrap();
        *session = apply(&plan.write, participants);
        plan
    }

    // Join

    #[test]
    fn join_confirms_while_seats_remain() {
        let (session, participants) = hosted_session(3);
        let plan = plan_join(&session, &participants, UserId::new(), Timestamp::now()).unwrap();

        assert!(plan.participant.is_confirmed());
        assert_eq!(plan.status_change, None);
        assert_eq!(plan.write.expected_version, session.version());
    }

    #[test]
    fn taking_last_seat_fills_session() {
        let (mut session, mut participants) = hosted_session(2);
        let plan = join(&mut session, &mut participants, UserId::new());

        assert!(plan.participant.is_confirmed());
        assert_eq!(plan.status_change, Some(SessionStatus::Full));
        assert_eq!(session.status(), SessionStatus::Full);
    }

    #[test]
    fn join_when_full_goes_to_waitlist() {
        let (mut session, mut participants) = hosted_session(2);
        join(&mut session, &mut participants, UserId::new());

        let plan = plan_join(&session, &participants, UserId::new(), Timestamp::now()).unwrap();
        assert!(plan.participant.is_pending());
        assert_eq!(plan.status_change, None);
    }

    #[test]
    fn join_rejects_duplicates() {
        let (mut session, mut participants) = hosted_session(2);
        let x = UserId::new();
        let y = UserId::new();
        join(&mut session, &mut participants, x);
        join(&mut session, &mut participants, y);

        let confirmed = plan_join(&session, &participants, x, Timestamp::now()).unwrap_err();
        assert_eq!(confirmed, SessionError::AlreadyJoined);

        let pending = plan_join(&session, &participants, y, Timestamp::now()).unwrap_err();
        assert_eq!(pending, SessionError::AlreadyJoined);

        let host = plan_join(&session, &participants, session.host_id(), Timestamp::now())
            .unwrap_err();
        assert_eq!(host, SessionError::AlreadyJoined);
    }

    #[test]
    fn join_rejects_user_who_left() {
        let (mut session, mut participants) = hosted_session(4);
        let user = UserId::new();
        join(&mut session, &mut participants, user);
        let leave = plan_leave(&session, &participants, user, Timestamp::now()).unwrap();
        session = apply(&leave.write, &mut participants);

        let err = plan_join(&session, &participants, user, Timestamp::now()).unwrap_err();
        assert_eq!(err, SessionError::PreviouslyCancelled);
    }

    #[test]
    fn join_rejects_terminal_session() {
        let (session, participants) = hosted_session(4);
        let cancel = plan_cancel(&session, &participants, session.host_id(), Timestamp::now())
            .unwrap();

        let err = plan_join(&cancel.write.session, &participants, UserId::new(), Timestamp::now())
            .unwrap_err();
        assert_eq!(err, SessionError::NotJoinable(SessionStatus::Cancelled));
    }

    #[test]
    fn join_rejects_started_session() {
        let today = Timestamp::now().to_local_naive();
        let mut f = fields();
        // A window that began an hour ago; never validated because only the
        // join rule is exercised here.
        let start = today - Duration::hours(1);
        f.window = crate::domain::session::SessionWindow::new(
            start.date(),
            start.time(),
            start.time() + Duration::minutes(1),
        );
        let session = Session::new(SessionId::new(), f).unwrap();

        let err = plan_join(&session, &[], UserId::new(), Timestamp::now()).unwrap_err();
        assert_eq!(err, SessionError::AlreadyStarted);
    }

    // Leave

    #[test]
    fn leaving_confirmed_promotes_earliest_pending() {
        let (mut session, mut participants) = hosted_session(2);
        let x = UserId::new();
        let y = UserId::new();
        let z = UserId::new();
        join(&mut session, &mut participants, x);
        let y_plan = join(&mut session, &mut participants, y);
        join(&mut session, &mut participants, z);

        let plan = plan_leave(&session, &participants, x, Timestamp::now()).unwrap();
        let promoted = plan.promoted.clone().unwrap();

        assert_eq!(promoted.id(), y_plan.participant.id());
        assert!(promoted.is_confirmed());
        assert_eq!(plan.status_change, None);
        assert_eq!(plan.write.session.status(), SessionStatus::Full);
        assert_eq!(plan.write.participant_updates.len(), 2);
    }

    #[test]
    fn leaving_full_session_without_waitlist_reopens() {
        let (mut session, mut participants) = hosted_session(2);
        let x = UserId::new();
        join(&mut session, &mut participants, x);

        let plan = plan_leave(&session, &participants, x, Timestamp::now()).unwrap();
        assert!(plan.promoted.is_none());
        assert_eq!(plan.status_change, Some(SessionStatus::Open));
    }

    #[test]
    fn leaving_waitlist_keeps_session_full() {
        let (mut session, mut participants) = hosted_session(2);
        join(&mut session, &mut participants, UserId::new());
        let waiting = UserId::new();
        join(&mut session, &mut participants, waiting);

        let plan = plan_leave(&session, &participants, waiting, Timestamp::now()).unwrap();
        assert!(plan.promoted.is_none());
        assert_eq!(plan.status_change, None);
        assert_eq!(plan.left.status(), ParticipantStatus::Cancelled);
        assert!(plan.left.cancelled_at().is_some());
    }

    #[test]
    fn host_cannot_leave() {
        let (session, participants) = hosted_session(4);
        let err = plan_leave(&session, &participants, session.host_id(), Timestamp::now())
            .unwrap_err();
        assert_eq!(err, SessionError::HostCannotLeave);
    }

    #[test]
    fn leave_respects_cancellation_policy() {
        let (mut session, mut participants) = hosted_session(4);
        let user = UserId::new();
        join(&mut session, &mut participants, user);
        session.set_allow_cancellation(false).unwrap();

        let err = plan_leave(&session, &participants, user, Timestamp::now()).unwrap_err();
        assert_eq!(err, SessionError::CancellationNotAllowed);
    }

    #[test]
    fn leave_after_deadline_is_rejected() {
        let (mut session, mut participants) = hosted_session(4);
        let user = UserId::new();
        join(&mut session, &mut participants, user);
        // The session is a week out; a deadline 30 days before it has passed.
        session.set_cancellation_deadline_hours(Some(24 * 30)).unwrap();

        let err = plan_leave(&session, &participants, user, Timestamp::now()).unwrap_err();
        assert!(matches!(err, SessionError::DeadlinePassed { .. }));
    }

    #[test]
    fn leave_with_stored_unbounded_deadline_is_rejected_not_panicking() {
        let (mut session, mut participants) = hosted_session(4);
        let user = UserId::new();
        join(&mut session, &mut participants, user);
        // Rows written before the bound existed can still carry any u32.
        let session = Session::reconstitute(
            session.id(),
            SessionFields {
                host_id: session.host_id(),
                venue_id: session.venue_id(),
                max_participants: 4,
                cancellation_deadline_hours: Some(u32::MAX),
                ..fields()
            },
            session.status(),
            session.created_at(),
            session.updated_at(),
            session.version(),
        );

        let err = plan_leave(&session, &participants, user, Timestamp::now()).unwrap_err();
        assert!(matches!(err, SessionError::DeadlinePassed { .. }));
    }

    #[test]
    fn leave_before_deadline_is_allowed() {
        let (mut session, mut participants) = hosted_session(4);
        let user = UserId::new();
        join(&mut session, &mut participants, user);
        session.set_cancellation_deadline_hours(Some(24)).unwrap();

        assert!(plan_leave(&session, &participants, user, Timestamp::now()).is_ok());
    }

    #[test]
    fn leave_requires_active_row() {
        let (session, participants) = hosted_session(4);
        let err = plan_leave(&session, &participants, UserId::new(), Timestamp::now())
            .unwrap_err();
        assert_eq!(err, SessionError::NotParticipating);
    }

    #[test]
    fn leave_from_cancelled_session_is_terminal() {
        let (mut session, mut participants) = hosted_session(4);
        let user = UserId::new();
        join(&mut session, &mut participants, user);
        let cancel =
            plan_cancel(&session, &participants, session.host_id(), Timestamp::now()).unwrap();
        session = apply(&cancel.write, &mut participants);

        let err = plan_leave(&session, &participants, user, Timestamp::now()).unwrap_err();
        assert_eq!(err, SessionError::AlreadyTerminal(SessionStatus::Cancelled));
    }

    // Cancel

    #[test]
    fn cancel_marks_everyone_cancelled() {
        let (mut session, mut participants) = hosted_session(2);
        join(&mut session, &mut participants, UserId::new());
        join(&mut session, &mut participants, UserId::new());

        let plan =
            plan_cancel(&session, &participants, session.host_id(), Timestamp::now()).unwrap();
        assert_eq!(plan.write.session.status(), SessionStatus::Cancelled);
        assert_eq!(plan.cancelled_participants.len(), 3);
        assert!(plan
            .write
            .participant_updates
            .iter()
            .all(|u| u.status == ParticipantStatus::Cancelled && u.cancelled_at.is_some()));
    }

    #[test]
    fn cancel_skips_rows_already_cancelled() {
        let (mut session, mut participants) = hosted_session(4);
        let user = UserId::new();
        join(&mut session, &mut participants, user);
        let leave = plan_leave(&session, &participants, user, Timestamp::now()).unwrap();
        session = apply(&leave.write, &mut participants);

        let plan =
            plan_cancel(&session, &participants, session.host_id(), Timestamp::now()).unwrap();
        assert_eq!(plan.cancelled_participants.len(), 1);
    }

    #[test]
    fn only_host_can_cancel() {
        let (session, participants) = hosted_session(4);
        let err = plan_cancel(&session, &participants, UserId::new(), Timestamp::now())
            .unwrap_err();
        assert_eq!(err, SessionError::Unauthorized);
    }

    #[test]
    fn cancel_twice_is_terminal() {
        let (session, participants) = hosted_session(4);
        let host = session.host_id();
        let first = plan_cancel(&session, &participants, host, Timestamp::now()).unwrap();

        let err = plan_cancel(&first.write.session, &participants, host, Timestamp::now())
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyTerminal(SessionStatus::Cancelled));
    }

    // Update

    #[test]
    fn update_overwrites_present_fields_only() {
        let (session, participants) = hosted_session(4);
        let changes = SessionChanges {
            title: Some("Sunday smash".to_string()),
            cost_per_person: Some(80.0),
            ..SessionChanges::default()
        };

        let plan =
            plan_update(&session, &participants, session.host_id(), changes, Timestamp::now())
                .unwrap();
        let updated = &plan.write.session;
        assert_eq!(updated.title(), "Sunday smash");
        assert_eq!(updated.cost_per_person(), 80.0);
        assert_eq!(updated.player_level(), session.player_level());
        assert!(!plan.courts_changed);
    }

    #[test]
    fn update_rejects_capacity_below_confirmed() {
        let (mut session, mut participants) = hosted_session(4);
        join(&mut session, &mut participants, UserId::new());
        join(&mut session, &mut participants, UserId::new());

        let changes = SessionChanges {
            max_participants: Some(2),
            ..SessionChanges::default()
        };
        let err =
            plan_update(&session, &participants, session.host_id(), changes, Timestamp::now())
                .unwrap_err();
        assert_eq!(
            err,
            SessionError::ParticipantLimitViolation {
                requested: 2,
                confirmed: 3
            }
        );
    }

    #[test]
    fn raising_capacity_promotes_waitlist_in_order() {
        let (mut session, mut participants) = hosted_session(2);
        join(&mut session, &mut participants, UserId::new());
        let first = join(&mut session, &mut participants, UserId::new()).participant;
        let second = join(&mut session, &mut participants, UserId::new()).participant;
        join(&mut session, &mut participants, UserId::new());

        let changes = SessionChanges {
            max_participants: Some(4),
            ..SessionChanges::default()
        };
        let plan =
            plan_update(&session, &participants, session.host_id(), changes, Timestamp::now())
                .unwrap();

        let ids: Vec<_> = plan.promoted.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
        assert_eq!(plan.write.session.status(), SessionStatus::Full);
        assert_eq!(plan.status_change, None);
    }

    #[test]
    fn raising_capacity_without_waitlist_reopens() {
        let (mut session, mut participants) = hosted_session(2);
        join(&mut session, &mut participants, UserId::new());

        let changes = SessionChanges {
            max_participants: Some(6),
            ..SessionChanges::default()
        };
        let plan =
            plan_update(&session, &participants, session.host_id(), changes, Timestamp::now())
                .unwrap();
        assert_eq!(plan.status_change, Some(SessionStatus::Open));
    }

    #[test]
    fn update_flags_court_changes() {
        let (session, participants) = hosted_session(4);
        let changes = SessionChanges {
            court_ids: Some(vec![CourtId::new()]),
            ..SessionChanges::default()
        };
        let plan =
            plan_update(&session, &participants, session.host_id(), changes, Timestamp::now())
                .unwrap();
        assert!(plan.courts_changed);
        assert!(plan.write.recheck_courts);

        let same = SessionChanges {
            court_ids: Some(session.court_ids().to_vec()),
            ..SessionChanges::default()
        };
        let plan =
            plan_update(&session, &participants, session.host_id(), same, Timestamp::now())
                .unwrap();
        assert!(!plan.courts_changed);
        assert!(!plan.write.recheck_courts);
    }

    #[test]
    fn update_is_host_only_and_not_after_end() {
        let (session, participants) = hosted_session(4);
        let err = plan_update(
            &session,
            &participants,
            UserId::new(),
            SessionChanges::default(),
            Timestamp::now(),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::Unauthorized);

        let mut done = session.clone();
        done.complete().unwrap();
        let err = plan_update(
            &done,
            &participants,
            done.host_id(),
            SessionChanges::default(),
            Timestamp::now(),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::AlreadyTerminal(SessionStatus::Completed));
    }

    #[test]
    fn update_surfaces_field_validation() {
        let (session, participants) = hosted_session(4);
        let changes = SessionChanges {
            title: Some("  ".to_string()),
            ..SessionChanges::default()
        };
        let err =
            plan_update(&session, &participants, session.host_id(), changes, Timestamp::now())
                .unwrap_err();
        assert!(matches!(err, SessionError::Validation { ref field, .. } if field == "title"));
    }

    // Full scenario

    #[test]
    fn waitlist_promotion_then_host_cancel() {
        let (mut session, mut participants) = hosted_session(2);
        let x = UserId::new();
        let y = UserId::new();

        let x_plan = join(&mut session, &mut participants, x);
        assert!(x_plan.participant.is_confirmed());
        assert_eq!(session.status(), SessionStatus::Full);

        let y_plan = join(&mut session, &mut participants, y);
        assert!(y_plan.participant.is_pending());

        let leave = plan_leave(&session, &participants, x, Timestamp::now()).unwrap();
        session = apply(&leave.write, &mut participants);
        let roster = ParticipantRoster::new(&participants);
        assert!(roster.find(y).unwrap().is_confirmed());
        assert_eq!(session.status(), SessionStatus::Full);

        let cancel =
            plan_cancel(&session, &participants, session.host_id(), Timestamp::now()).unwrap();
        session = apply(&cancel.write, &mut participants);
        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert!(participants
            .iter()
            .all(|p| p.status() == ParticipantStatus::Cancelled));
    }

    #[test]
    fn fields_helper_builds_valid_session() {
        let f: SessionFields = fields();
        assert!(Session::new(SessionId::new(), f).is_ok());
    }
}
