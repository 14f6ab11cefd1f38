//! PostgreSQL implementation of VenueDirectory.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, VenueId};
use crate::domain::venue::{OperatingRange, Venue, VenueStatus};
use crate::ports::VenueDirectory;

/// Reads venues and their JSONB operating ranges.
#[derive(Clone)]
pub struct PostgresVenueDirectory {
    pool: PgPool,
}

impl PostgresVenueDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueDirectory for PostgresVenueDirectory {
    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, location, status, open_range::text AS open_range
            FROM venues
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("fetch venue", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = |what: &str, e: &dyn std::fmt::Display| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to decode venue {}: {}", what, e),
            )
        };

        let id: Uuid = row.try_get("id").map_err(|e| decode("id", &e))?;
        let name: String = row.try_get("name").map_err(|e| decode("name", &e))?;
        let location: String = row
            .try_get("location")
            .map_err(|e| decode("location", &e))?;
        let status: String = row.try_get("status").map_err(|e| decode("status", &e))?;
        let ranges: String = row
            .try_get("open_range")
            .map_err(|e| decode("open_range", &e))?;

        let status: VenueStatus = status.parse().map_err(|e| decode("status", &e))?;
        let operating_ranges: Vec<OperatingRange> =
            serde_json::from_str(&ranges).map_err(|e| decode("open_range", &e))?;

        Ok(Some(Venue {
            id: VenueId::from_uuid(id),
            name,
            location,
            status,
            operating_ranges,
        }))
    }
}
