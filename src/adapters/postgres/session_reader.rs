//! PostgreSQL implementation of SessionReader.
//!
//! Provides read-optimized queries for session lists with head counts.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::rows::{row_to_session, SESSION_COLUMNS};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{SessionFilter, SessionPage, SessionReader, SessionSummary};

/// Confirmed and pending head counts appended to every summary row.
const COUNT_COLUMNS: &str = r#"
    (SELECT COUNT(*) FROM session_participants p
      WHERE p.session_id = s.id AND p.status = 'confirmed') AS confirmed_count,
    (SELECT COUNT(*) FROM session_participants p
      WHERE p.session_id = s.id AND p.status = 'pending') AS pending_count
"#;

/// Filter predicate shared by the list and count queries.
const FILTER_CLAUSE: &str = r#"
    ($1::date IS NULL OR s.session_date = $1)
    AND ($2::uuid IS NULL OR s.venue_id = $2)
    AND ($3::text IS NULL OR s.player_level = $3)
    AND ($4::text IS NULL OR s.status = $4)
"#;

/// PostgreSQL implementation of SessionReader.
#[derive(Clone)]
pub struct PostgresSessionReader {
    pool: PgPool,
}

impl PostgresSessionReader {
    /// Creates a new PostgresSessionReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionReader for PostgresSessionReader {
    async fn list(&self, filter: &SessionFilter) -> Result<SessionPage, DomainError> {
        let date = filter.date;
        let venue = filter.venue_id.map(|v| *v.as_uuid());
        let level = filter.player_level.map(|l| l.as_str());
        let status = filter.status.map(|s| s.as_str());

        let count_sql = format!("SELECT COUNT(*) FROM play_sessions s WHERE {}", FILTER_CLAUSE);
        let total: (i64,) = sqlx::query_as(&count_sql)
            .bind(date)
            .bind(venue)
            .bind(level)
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("count sessions", e))?;

        let list_sql = format!(
            "SELECT {}, {} FROM play_sessions s WHERE {} \
             ORDER BY s.session_date, s.start_time, s.created_at \
             LIMIT $5 OFFSET $6",
            SESSION_COLUMNS, COUNT_COLUMNS, FILTER_CLAUSE
        );
        let rows = sqlx::query(&list_sql)
            .bind(date)
            .bind(venue)
            .bind(level)
            .bind(status)
            .bind(i64::from(filter.limit))
            .bind(i64::from(filter.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("list sessions", e))?;

        let items = rows
            .iter()
            .map(row_to_summary)
            .collect::<Result<Vec<_>, _>>()?;

        let total = u64::try_from(total.0).unwrap_or(0);
        let has_more = u64::from(filter.offset) + (items.len() as u64) < total;

        Ok(SessionPage {
            items,
            total,
            has_more,
        })
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        since: Option<NaiveDate>,
    ) -> Result<Vec<SessionSummary>, DomainError> {
        let sql = format!(
            "SELECT {}, {} FROM play_sessions s \
             WHERE (s.host_id = $1 OR EXISTS ( \
                 SELECT 1 FROM session_participants p \
                 WHERE p.session_id = s.id AND p.user_id = $1)) \
               AND ($2::date IS NULL OR s.session_date >= $2) \
             ORDER BY s.session_date, s.start_time, s.created_at",
            SESSION_COLUMNS, COUNT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.as_uuid())
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("list user sessions", e))?;

        rows.iter().map(row_to_summary).collect()
    }
}

fn row_to_summary(row: &PgRow) -> Result<SessionSummary, DomainError> {
    let confirmed: i64 = row.try_get("confirmed_count").map_err(count_err)?;
    let pending: i64 = row.try_get("pending_count").map_err(count_err)?;

    Ok(SessionSummary {
        session: row_to_session(row)?,
        confirmed_count: u32::try_from(confirmed).unwrap_or(u32::MAX),
        pending_count: u32::try_from(pending).unwrap_or(u32::MAX),
    })
}

fn count_err(e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to decode participant counts: {}", e),
    )
}
