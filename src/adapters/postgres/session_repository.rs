//! PostgreSQL implementation of SessionRepository.
//!
//! Every write runs in one transaction. `create`, and any `apply` that moves
//! a session onto new courts, serialize on per-court, per-date advisory
//! locks before checking for overlaps; `apply` guards the session row with a
//! version compare-and-swap.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use super::rows::{
    court_uuids, row_to_participant, row_to_session, rule_strings, to_i32, PARTICIPANT_COLUMNS,
    SESSION_COLUMNS,
};
use crate::domain::foundation::{CourtId, DomainError, ErrorCode, SessionId};
use crate::domain::session::{check_conflict, Participant, Session};
use crate::ports::{SessionDetail, SessionRepository, SessionWrite};

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a new PostgresSessionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::database("begin transaction", e))
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::database("commit transaction", e))
}

async fn insert_participant(
    tx: &mut Transaction<'static, Postgres>,
    participant: &Participant,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO session_participants (
            id, session_id, user_id, status, joined_at, cancelled_at
        ) VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(participant.id().as_uuid())
    .bind(participant.session_id().as_uuid())
    .bind(participant.user_id().as_uuid())
    .bind(participant.status().as_str())
    .bind(participant.joined_at().as_datetime())
    .bind(participant.cancelled_at().map(|t| *t.as_datetime()))
    .execute(&mut **tx)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => DomainError::new(
            ErrorCode::ConcurrencyConflict,
            format!(
                "User {} already has a row in session {}",
                participant.user_id(),
                participant.session_id()
            ),
        ),
        _ => DomainError::database("insert participant", e),
    })?;
    Ok(())
}

/// Takes the advisory lock for each of `session`'s courts on its date, then
/// fails if another live session overlaps it there. Locks are taken in court
/// order so concurrent writers cannot deadlock.
async fn lock_and_check_courts(
    tx: &mut Transaction<'static, Postgres>,
    session: &Session,
    exclude: Option<SessionId>,
) -> Result<(), DomainError> {
    let mut courts = session.court_ids().to_vec();
    courts.sort();
    for court_id in &courts {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("{}:{}", court_id, session.date()))
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::database("lock court", e))?;

        let existing = sessions_on_court(&mut **tx, *court_id, session.date()).await?;
        check_conflict(*court_id, session.window(), &existing, exclude)?;
    }
    Ok(())
}

async fn sessions_on_court(
    executor: impl sqlx::PgExecutor<'_>,
    court_id: CourtId,
    date: NaiveDate,
) -> Result<Vec<Session>, DomainError> {
    let sql = format!(
        "SELECT {} FROM play_sessions s \
         WHERE $1 = ANY(s.court_ids) AND s.session_date = $2 \
         ORDER BY s.start_time",
        SESSION_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(court_id.as_uuid())
        .bind(date)
        .fetch_all(executor)
        .await
        .map_err(|e| DomainError::database("fetch sessions by court", e))?;

    rows.iter().map(row_to_session).collect()
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn find_by_id(&self, id: SessionId) -> Result<Option<SessionDetail>, DomainError> {
        let sql = format!("SELECT {} FROM play_sessions s WHERE s.id = $1", SESSION_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("fetch session", e))?;

        match row {
            Some(row) => {
                let session = row_to_session(&row)?;
                let participants = self.participants(id).await?;
                Ok(Some(SessionDetail {
                    session,
                    participants,
                }))
            }
            None => Ok(None),
        }
    }

    async fn participants(&self, id: SessionId) -> Result<Vec<Participant>, DomainError> {
        let sql = format!(
            "SELECT {} FROM session_participants WHERE session_id = $1 ORDER BY joined_at, seq",
            PARTICIPANT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("fetch participants", e))?;

        rows.iter().map(row_to_participant).collect()
    }

    async fn list_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> Result<Vec<Session>, DomainError> {
        sessions_on_court(&self.pool, court_id, date).await
    }

    async fn create(&self, session: &Session, host: &Participant) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        lock_and_check_courts(&mut tx, session, None).await?;

        sqlx::query(
            r#"
            INSERT INTO play_sessions (
                id, host_id, venue_id, title, description,
                session_date, start_time, end_time, player_level,
                max_participants, cost_per_person, allow_cancellation,
                cancellation_deadline_hours, status, court_ids, rules,
                version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.host_id().as_uuid())
        .bind(session.venue_id().as_uuid())
        .bind(session.title())
        .bind(session.description())
        .bind(session.date())
        .bind(session.start_time())
        .bind(session.end_time())
        .bind(session.player_level().as_str())
        .bind(to_i32("max_participants", session.max_participants())?)
        .bind(session.cost_per_person())
        .bind(session.allow_cancellation())
        .bind(
            session
                .cancellation_deadline_hours()
                .map(|h| to_i32("cancellation_deadline_hours", h))
                .transpose()?,
        )
        .bind(session.status().as_str())
        .bind(court_uuids(session))
        .bind(rule_strings(session))
        .bind(session.version())
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("insert session", e))?;

        insert_participant(&mut tx, host).await?;

        commit(tx).await
    }

    async fn apply(&self, write: &SessionWrite) -> Result<Session, DomainError> {
        let session = &write.session;
        let mut tx = self.begin().await?;
        if write.recheck_courts {
            lock_and_check_courts(&mut tx, session, Some(session.id())).await?;
        }

        let bumped: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE play_sessions SET
                title = $3,
                description = $4,
                player_level = $5,
                max_participants = $6,
                cost_per_person = $7,
                allow_cancellation = $8,
                cancellation_deadline_hours = $9,
                status = $10,
                court_ids = $11,
                rules = $12,
                updated_at = $13,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING version
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(write.expected_version)
        .bind(session.title())
        .bind(session.description())
        .bind(session.player_level().as_str())
        .bind(to_i32("max_participants", session.max_participants())?)
        .bind(session.cost_per_person())
        .bind(session.allow_cancellation())
        .bind(
            session
                .cancellation_deadline_hours()
                .map(|h| to_i32("cancellation_deadline_hours", h))
                .transpose()?,
        )
        .bind(session.status().as_str())
        .bind(court_uuids(session))
        .bind(rule_strings(session))
        .bind(session.updated_at().as_datetime())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database("update session", e))?;

        let version = match bumped {
            Some((version,)) => version,
            None => {
                let exists: (bool,) =
                    sqlx::query_as("SELECT EXISTS(SELECT 1 FROM play_sessions WHERE id = $1)")
                        .bind(session.id().as_uuid())
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(|e| DomainError::database("check session existence", e))?;

                return Err(if exists.0 {
                    DomainError::new(
                        ErrorCode::ConcurrencyConflict,
                        format!(
                            "Session {} changed since version {}",
                            session.id(),
                            write.expected_version
                        ),
                    )
                } else {
                    DomainError::new(
                        ErrorCode::SessionNotFound,
                        format!("Session not found: {}", session.id()),
                    )
                    .with_detail("session_id", session.id().to_string())
                });
            }
        };

        for update in &write.participant_updates {
            let result = sqlx::query(
                r#"
                UPDATE session_participants SET status = $2, cancelled_at = $3
                WHERE id = $1 AND session_id = $4
                "#,
            )
            .bind(update.participant_id.as_uuid())
            .bind(update.status.as_str())
            .bind(update.cancelled_at.map(|t| *t.as_datetime()))
            .bind(session.id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("update participant", e))?;

            if result.rows_affected() == 0 {
                return Err(DomainError::new(
                    ErrorCode::ParticipantNotFound,
                    format!("Participant not found: {}", update.participant_id),
                ));
            }
        }

        for participant in &write.new_participants {
            insert_participant(&mut tx, participant).await?;
        }

        commit(tx).await?;

        tracing::debug!(session_id = %session.id(), version, "session write applied");
        Ok(session.clone().with_version(version))
    }
}
