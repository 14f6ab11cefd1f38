//! Builders shared by the session domain tests.

use chrono::{Duration, NaiveDate, NaiveTime};

use super::{Participant, PlayerLevel, Session, SessionFields, SessionWindow};
use crate::domain::foundation::{
    local_now, CourtId, ParticipantStatus, SessionId, Timestamp, UserId, VenueId,
};

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// A week from today: always bookable and never started.
pub fn future_date() -> NaiveDate {
    local_now().date() + Duration::days(7)
}

pub fn window_times(start: NaiveTime, end: NaiveTime) -> SessionWindow {
    SessionWindow::new(future_date(), start, end)
}

pub fn window_at(sh: u32, sm: u32, eh: u32, em: u32) -> SessionWindow {
    window_times(t(sh, sm), t(eh, em))
}

pub fn fields() -> SessionFields {
    SessionFields {
        host_id: UserId::new(),
        venue_id: VenueId::new(),
        title: "Evening doubles".to_string(),
        description: None,
        window: window_at(18, 0, 20, 0),
        player_level: PlayerLevel::Intermediate,
        max_participants: 4,
        cost_per_person: 120.0,
        allow_cancellation: true,
        cancellation_deadline_hours: None,
        court_ids: vec![CourtId::new()],
        rules: vec![],
    }
}

pub fn session_on(court_ids: &[CourtId], window: SessionWindow) -> Session {
    Session::new(
        SessionId::new(),
        SessionFields {
            court_ids: court_ids.to_vec(),
            window,
            ..fields()
        },
    )
    .unwrap()
}

/// A fresh session with capacity `max` and the host's confirmed row.
pub fn hosted_session(max: u32) -> (Session, Vec<Participant>) {
    let session = Session::new(
        SessionId::new(),
        SessionFields {
            max_participants: max,
            ..fields()
        },
    )
    .unwrap();
    let host = Participant::join(
        session.id(),
        session.host_id(),
        ParticipantStatus::Confirmed,
        Timestamp::now(),
    );
    (session, vec![host])
}
