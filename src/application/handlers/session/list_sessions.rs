//! ListSessionsHandler - Query handler for browsing sessions.

use std::sync::Arc;

use crate::domain::foundation::{parse_date, SessionStatus, VenueId};
use crate::domain::session::{PlayerLevel, SessionError};
use crate::ports::{SessionFilter, SessionPage, SessionReader};

use super::input::{parse_id, parse_level, parse_optional, parse_status};

/// Query to list sessions. Blank or absent filters match everything.
#[derive(Debug, Clone, Default)]
pub struct ListSessionsQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub venue_id: Option<String>,
    pub player_level: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListSessionsQuery {
    fn to_filter(&self) -> Result<SessionFilter, SessionError> {
        Ok(SessionFilter {
            date: parse_optional(self.date.as_deref(), |s| Ok(parse_date("date", s)?))?,
            venue_id: parse_optional(self.venue_id.as_deref(), |s| {
                parse_id::<VenueId>("venue_id", s)
            })?,
            player_level: parse_optional::<PlayerLevel>(self.player_level.as_deref(), parse_level)?,
            status: parse_optional(self.status.as_deref(), |s| {
                parse_status::<SessionStatus>("status", s)
            })?,
            ..SessionFilter::paginated(self.limit, self.offset)
        })
    }
}

/// Handler for listing sessions.
pub struct ListSessionsHandler {
    reader: Arc<dyn SessionReader>,
}

impl ListSessionsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListSessionsQuery) -> Result<SessionPage, SessionError> {
        let filter = query.to_filter()?;
        Ok(self.reader.list(&filter).await?)
    }
}
