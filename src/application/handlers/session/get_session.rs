//! GetSessionHandler - Query handler for retrieving a session with its roster.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::SessionError;
use crate::ports::{SessionDetail, SessionRepository};

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for retrieving session details.
pub struct GetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<SessionDetail, SessionError> {
        self.repository
            .find_by_id(query.session_id)
            .await?
            .ok_or(SessionError::NotFound(query.session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::session::testing::{FailingRepository, Harness};
    use crate::domain::session::ErrorCategory;

    #[tokio::test]
    async fn returns_session_with_participants() {
        let h = Harness::new().await;
        let session = h.seed_session(4).await;
        let handler = GetSessionHandler::new(h.store.clone());

        let detail = handler
            .handle(GetSessionQuery {
                session_id: session.id(),
            })
            .await
            .unwrap();

        assert_eq!(detail.session.id(), session.id());
        assert_eq!(detail.participants.len(), 1);
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let h = Harness::new().await;
        let handler = GetSessionHandler::new(h.store.clone());
        let id = SessionId::new();

        let err = handler.handle(GetSessionQuery { session_id: id }).await.unwrap_err();
        assert_eq!(err, SessionError::NotFound(id));
    }

    #[tokio::test]
    async fn storage_failure_is_infrastructure() {
        let handler = GetSessionHandler::new(Arc::new(FailingRepository));
        let err = handler
            .handle(GetSessionQuery {
                session_id: SessionId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Infrastructure);
    }
}
