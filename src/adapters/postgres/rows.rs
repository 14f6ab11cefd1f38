//! Row decoding shared by the Postgres session adapters.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::foundation::{
    CourtId, DomainError, ErrorCode, ParticipantId, SessionId, SessionStatus, Timestamp, UserId,
    VenueId,
};
use crate::domain::session::{Participant, Session, SessionFields, SessionRule, SessionWindow};

/// Columns selected whenever a full session row is needed.
pub(super) const SESSION_COLUMNS: &str = r#"
    s.id, s.host_id, s.venue_id, s.title, s.description,
    s.session_date, s.start_time, s.end_time, s.player_level,
    s.max_participants, s.cost_per_person, s.allow_cancellation,
    s.cancellation_deadline_hours, s.status, s.court_ids, s.rules,
    s.version, s.created_at, s.updated_at
"#;

pub(super) const PARTICIPANT_COLUMNS: &str =
    "id, session_id, user_id, status, joined_at, cancelled_at";

fn decode_err(what: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to decode {}: {}", what, e),
    )
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column).map_err(|e| decode_err(column, e))
}

pub(super) fn row_to_session(row: &PgRow) -> Result<Session, DomainError> {
    let id: Uuid = get(row, "id")?;
    let host_id: Uuid = get(row, "host_id")?;
    let venue_id: Uuid = get(row, "venue_id")?;
    let date: NaiveDate = get(row, "session_date")?;
    let start: NaiveTime = get(row, "start_time")?;
    let end: NaiveTime = get(row, "end_time")?;
    let level: String = get(row, "player_level")?;
    let max_participants: i32 = get(row, "max_participants")?;
    let deadline: Option<i32> = get(row, "cancellation_deadline_hours")?;
    let status: String = get(row, "status")?;
    let court_ids: Vec<Uuid> = get(row, "court_ids")?;
    let rules: Vec<String> = get(row, "rules")?;
    let created_at: DateTime<Utc> = get(row, "created_at")?;
    let updated_at: DateTime<Utc> = get(row, "updated_at")?;

    let fields = SessionFields {
        host_id: UserId::from_uuid(host_id),
        venue_id: VenueId::from_uuid(venue_id),
        title: get(row, "title")?,
        description: get(row, "description")?,
        window: SessionWindow::new(date, start, end),
        player_level: level.parse().map_err(|e| decode_err("player_level", e))?,
        max_participants: u32::try_from(max_participants)
            .map_err(|e| decode_err("max_participants", e))?,
        cost_per_person: get(row, "cost_per_person")?,
        allow_cancellation: get(row, "allow_cancellation")?,
        cancellation_deadline_hours: deadline
            .map(u32::try_from)
            .transpose()
            .map_err(|e| decode_err("cancellation_deadline_hours", e))?,
        court_ids: court_ids.into_iter().map(CourtId::from_uuid).collect(),
        rules: SessionRule::parse_all(rules).map_err(|e| decode_err("rules", e))?,
    };

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        fields,
        status
            .parse::<SessionStatus>()
            .map_err(|e| decode_err("status", e))?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
        get(row, "version")?,
    ))
}

pub(super) fn row_to_participant(row: &PgRow) -> Result<Participant, DomainError> {
    let id: Uuid = get(row, "id")?;
    let session_id: Uuid = get(row, "session_id")?;
    let user_id: Uuid = get(row, "user_id")?;
    let status: String = get(row, "status")?;
    let joined_at: DateTime<Utc> = get(row, "joined_at")?;
    let cancelled_at: Option<DateTime<Utc>> = get(row, "cancelled_at")?;

    Ok(Participant::reconstitute(
        ParticipantId::from_uuid(id),
        SessionId::from_uuid(session_id),
        UserId::from_uuid(user_id),
        status.parse().map_err(|e| decode_err("participant status", e))?,
        Timestamp::from_datetime(joined_at),
        cancelled_at.map(Timestamp::from_datetime),
    ))
}

/// Converts capacity and deadline into the INTEGER columns.
pub(super) fn to_i32(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| DomainError::validation(field, "Value is too large"))
}

pub(super) fn court_uuids(session: &Session) -> Vec<Uuid> {
    session.court_ids().iter().map(|c| *c.as_uuid()).collect()
}

pub(super) fn rule_strings(session: &Session) -> Vec<String> {
    session.rules().iter().map(|r| r.as_str().to_string()).collect()
}
