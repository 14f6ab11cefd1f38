//! ListUserSessionsHandler - Query handler for a user's own sessions.

use std::sync::Arc;

use crate::domain::foundation::{local_now, UserId};
use crate::domain::session::SessionError;
use crate::ports::{SessionReader, SessionSummary};

/// Query to list the sessions a user hosts or has joined.
#[derive(Debug, Clone)]
pub struct ListUserSessionsQuery {
    pub user_id: UserId,
    /// Include sessions dated before today.
    pub include_history: bool,
}

/// Handler for listing a user's sessions.
pub struct ListUserSessionsHandler {
    reader: Arc<dyn SessionReader>,
}

impl ListUserSessionsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListUserSessionsQuery,
    ) -> Result<Vec<SessionSummary>, SessionError> {
        let since = if query.include_history {
            None
        } else {
            Some(local_now().date())
        };
        Ok(self.reader.list_for_user(query.user_id, since).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::session::testing::{metadata, Harness};
    use crate::application::handlers::session::{JoinSessionCommand, JoinSessionHandler};

    #[tokio::test]
    async fn includes_hosted_and_joined_sessions() {
        let h = Harness::new().await;
        let session = h.seed_session(4).await;
        let player = UserId::new();
        JoinSessionHandler::new(h.store.clone(), h.events.clone())
            .handle(
                JoinSessionCommand {
                    session_id: session.id(),
                    user_id: player,
                },
                metadata(player),
            )
            .await
            .unwrap();
        let handler = ListUserSessionsHandler::new(h.store.clone());

        for user in [h.host, player] {
            let sessions = handler
                .handle(ListUserSessionsQuery {
                    user_id: user,
                    include_history: false,
                })
                .await
                .unwrap();
            assert_eq!(sessions.len(), 1);
            assert_eq!(sessions[0].session.id(), session.id());
            assert_eq!(sessions[0].confirmed_count, 2);
        }

        let sessions = handler
            .handle(ListUserSessionsQuery {
                user_id: UserId::new(),
                include_history: true,
            })
            .await
            .unwrap();
        assert!(sessions.is_empty());
    }
}
