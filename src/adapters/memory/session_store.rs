//! In-memory session storage.
//!
//! Holds sessions and participant rows behind one `tokio::sync::RwLock`.
//! Every mutating call takes the write lock for its whole duration, which
//! gives the same all-or-nothing, version-checked behaviour the Postgres
//! adapter gets from a transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    CourtId, DomainError, ErrorCode, ParticipantStatus, SessionId, UserId,
};
use crate::domain::session::{check_conflict, Participant, ParticipantRoster, Session};
use crate::ports::{
    SessionDetail, SessionFilter, SessionPage, SessionReader, SessionRepository, SessionSummary,
    SessionWrite,
};

#[derive(Default)]
struct State {
    sessions: HashMap<SessionId, Session>,
    /// Participant rows per session, in insertion order.
    participants: HashMap<SessionId, Vec<Participant>>,
}

impl State {
    fn rows(&self, id: SessionId) -> Vec<Participant> {
        let mut rows = self.participants.get(&id).cloned().unwrap_or_default();
        // Stable: equal timestamps keep insertion order.
        rows.sort_by_key(|p| p.joined_at());
        rows
    }

    /// Fails if any of `session`'s courts is taken by another live session.
    fn check_courts(&self, session: &Session, exclude: Option<SessionId>) -> Result<(), DomainError> {
        let same_day: Vec<Session> = self
            .sessions
            .values()
            .filter(|s| s.date() == session.date())
            .cloned()
            .collect();
        for court_id in session.court_ids() {
            check_conflict(*court_id, session.window(), &same_day, exclude)?;
        }
        Ok(())
    }

    fn summary(&self, session: &Session) -> SessionSummary {
        let rows = self.participants.get(&session.id()).map(Vec::as_slice).unwrap_or(&[]);
        let counts = ParticipantRoster::new(rows).counts();
        SessionSummary {
            session: session.clone(),
            confirmed_count: counts.confirmed as u32,
            pending_count: counts.pending as u32,
        }
    }
}

/// Session repository and reader for tests and local runs.
#[derive(Default)]
pub struct InMemorySessionStore {
    state: RwLock<State>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }
}

fn sorted_by_start(mut sessions: Vec<&Session>) -> Vec<&Session> {
    sessions.sort_by_key(|s| (s.date(), s.start_time(), s.created_at()));
    sessions
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn find_by_id(&self, id: SessionId) -> Result<Option<SessionDetail>, DomainError> {
        let state = self.state.read().await;
        Ok(state.sessions.get(&id).map(|session| SessionDetail {
            session: session.clone(),
            participants: state.rows(id),
        }))
    }

    async fn participants(&self, id: SessionId) -> Result<Vec<Participant>, DomainError> {
        Ok(self.state.read().await.rows(id))
    }

    async fn list_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> Result<Vec<Session>, DomainError> {
        let state = self.state.read().await;
        let matching = state
            .sessions
            .values()
            .filter(|s| s.date() == date && s.uses_court(court_id))
            .collect();
        Ok(sorted_by_start(matching).into_iter().cloned().collect())
    }

    async fn create(&self, session: &Session, host: &Participant) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        if state.sessions.contains_key(&session.id()) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Session already exists: {}", session.id()),
            ));
        }

        state.check_courts(session, None)?;

        state.sessions.insert(session.id(), session.clone());
        state.participants.insert(session.id(), vec![host.clone()]);
        Ok(())
    }

    async fn apply(&self, write: &SessionWrite) -> Result<Session, DomainError> {
        let mut state = self.state.write().await;
        let id = write.session.id();

        let stored_version = state
            .sessions
            .get(&id)
            .map(Session::version)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
                    .with_detail("session_id", id.to_string())
            })?;

        if stored_version != write.expected_version {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!(
                    "Session {} is at version {}, expected {}",
                    id, stored_version, write.expected_version
                ),
            ));
        }
        if write.recheck_courts {
            state.check_courts(&write.session, Some(id))?;
        }

        let mut rows = state.participants.get(&id).cloned().unwrap_or_default();
        for update in &write.participant_updates {
            let row = rows
                .iter_mut()
                .find(|p| p.id() == update.participant_id)
                .ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::ParticipantNotFound,
                        format!("Participant not found: {}", update.participant_id),
                    )
                })?;
            *row = Participant::reconstitute(
                row.id(),
                row.session_id(),
                row.user_id(),
                update.status,
                row.joined_at(),
                update.cancelled_at,
            );
        }
        for participant in &write.new_participants {
            if rows.iter().any(|p| p.user_id() == participant.user_id()) {
                return Err(DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!("User {} already has a row in session {}", participant.user_id(), id),
                ));
            }
            rows.push(participant.clone());
        }

        let stored = write.session.clone().with_version(stored_version + 1);
        state.sessions.insert(id, stored.clone());
        state.participants.insert(id, rows);
        Ok(stored)
    }
}

#[async_trait]
impl SessionReader for InMemorySessionStore {
    async fn list(&self, filter: &SessionFilter) -> Result<SessionPage, DomainError> {
        let state = self.state.read().await;
        let matching = sorted_by_start(
            state
                .sessions
                .values()
                .filter(|s| filter.matches(s))
                .collect(),
        );

        let total = matching.len() as u64;
        let items: Vec<SessionSummary> = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .map(|s| state.summary(s))
            .collect();
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
        let state = self.state.read().await;
        let involved = |s: &Session| {
            s.is_host(user_id)
                || state
                    .participants
                    .get(&s.id())
                    .is_some_and(|rows| rows.iter().any(|p| p.user_id() == user_id))
        };

        let matching = sorted_by_start(
            state
                .sessions
                .values()
                .filter(|s| since.map_or(true, |d| s.date() >= d))
                .filter(|s| involved(s))
                .collect(),
        );
        Ok(matching.into_iter().map(|s| state.summary(s)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionStatus, Timestamp};
    use crate::domain::session::{
        plan_join, plan_update, PlayerLevel, SessionChanges, SessionFields, SessionWindow,
    };
    use chrono::{Duration, NaiveTime};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn next_week() -> NaiveDate {
        crate::domain::foundation::local_now().date() + Duration::days(7)
    }

    fn session(court: CourtId, start: NaiveTime, end: NaiveTime, max: u32) -> Session {
        Session::new(
            SessionId::new(),
            SessionFields {
                host_id: UserId::new(),
                venue_id: crate::domain::foundation::VenueId::new(),
                title: "Morning rally".to_string(),
                description: None,
                window: SessionWindow::new(next_week(), start, end),
                player_level: PlayerLevel::Beginner,
                max_participants: max,
                cost_per_person: 0.0,
                allow_cancellation: true,
                cancellation_deadline_hours: None,
                court_ids: vec![court],
                rules: vec![],
            },
        )
        .unwrap()
    }

    fn host_row(session: &Session) -> Participant {
        Participant::join(
            session.id(),
            session.host_id(),
            ParticipantStatus::Confirmed,
            Timestamp::now(),
        )
    }

    async fn stored(store: &InMemorySessionStore, court: CourtId, max: u32) -> Session {
        let s = session(court, t(9, 0), t(11, 0), max);
        store.create(&s, &host_row(&s)).await.unwrap();
        s
    }

    #[tokio::test]
    async fn create_stores_session_with_host() {
        let store = InMemorySessionStore::new();
        let s = stored(&store, CourtId::new(), 4).await;

        let detail = store.find_by_id(s.id()).await.unwrap().unwrap();
        assert_eq!(detail.session, s);
        assert_eq!(detail.participants.len(), 1);
        assert!(detail.participants[0].is_confirmed());
    }

    #[tokio::test]
    async fn create_rejects_overlap_on_same_court() {
        let store = InMemorySessionStore::new();
        let court = CourtId::new();
        stored(&store, court, 4).await;

        let clash = session(court, t(10, 0), t(12, 0), 4);
        let err = store.create(&clash, &host_row(&clash)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CourtBooked);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn create_allows_touching_window() {
        let store = InMemorySessionStore::new();
        let court = CourtId::new();
        stored(&store, court, 4).await;

        let after = session(court, t(11, 0), t(12, 0), 4);
        assert!(store.create(&after, &host_row(&after)).await.is_ok());
    }

    #[tokio::test]
    async fn apply_bumps_version_and_inserts_rows() {
        let store = InMemorySessionStore::new();
        let s = stored(&store, CourtId::new(), 2).await;
        let detail = store.find_by_id(s.id()).await.unwrap().unwrap();

        let plan = plan_join(&detail.session, &detail.participants, UserId::new(), Timestamp::now())
            .unwrap();
        let saved = store.apply(&plan.write).await.unwrap();

        assert_eq!(saved.version(), 1);
        assert_eq!(saved.status(), SessionStatus::Full);
        assert_eq!(store.participants(s.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn apply_rejects_stale_version() {
        let store = InMemorySessionStore::new();
        let s = stored(&store, CourtId::new(), 4).await;
        let detail = store.find_by_id(s.id()).await.unwrap().unwrap();

        let first = plan_join(&detail.session, &detail.participants, UserId::new(), Timestamp::now())
            .unwrap();
        let second = plan_join(&detail.session, &detail.participants, UserId::new(), Timestamp::now())
            .unwrap();

        store.apply(&first.write).await.unwrap();
        let err = store.apply(&second.write).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        assert_eq!(store.participants(s.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn apply_rechecks_courts_a_session_moves_onto() {
        let store = InMemorySessionStore::new();
        let (home, taken) = (CourtId::new(), CourtId::new());
        let s = stored(&store, home, 4).await;
        let detail = store.find_by_id(s.id()).await.unwrap().unwrap();
        let plan = plan_update(
            &detail.session,
            &detail.participants,
            s.host_id(),
            SessionChanges {
                court_ids: Some(vec![taken]),
                ..SessionChanges::default()
            },
            Timestamp::now(),
        )
        .unwrap();

        // Booked after the plan was made, as a concurrent create would.
        stored(&store, taken, 4).await;

        let err = store.apply(&plan.write).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CourtBooked);
        let unchanged = store.find_by_id(s.id()).await.unwrap().unwrap();
        assert_eq!(unchanged.session.court_ids(), &[home]);
        assert_eq!(unchanged.session.version(), 0);
    }

    #[tokio::test]
    async fn apply_to_missing_session_is_not_found() {
        let store = InMemorySessionStore::new();
        let s = session(CourtId::new(), t(9, 0), t(10, 0), 4);
        let plan = plan_join(&s, &[host_row(&s)], UserId::new(), Timestamp::now()).unwrap();

        let err = store.apply(&plan.write).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
        assert_eq!(err.detail("session_id"), Some(s.id().to_string().as_str()));
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let store = InMemorySessionStore::new();
        for _ in 0..3 {
            stored(&store, CourtId::new(), 4).await;
        }

        let mut filter = SessionFilter::paginated(Some(2), None);
        filter.date = Some(next_week());
        let page = store.list(&filter).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);

        filter.offset = 2;
        let last = store.list(&filter).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_more);

        filter.player_level = Some(PlayerLevel::Advanced);
        assert_eq!(store.list(&filter).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn list_for_user_covers_hosted_and_joined() {
        let store = InMemorySessionStore::new();
        let hosted = stored(&store, CourtId::new(), 4).await;
        let other = stored(&store, CourtId::new(), 4).await;
        stored(&store, CourtId::new(), 4).await;

        let user = hosted.host_id();
        let detail = store.find_by_id(other.id()).await.unwrap().unwrap();
        let plan = plan_join(&detail.session, &detail.participants, user, Timestamp::now()).unwrap();
        store.apply(&plan.write).await.unwrap();

        let mine = store.list_for_user(user, None).await.unwrap();
        assert_eq!(mine.len(), 2);

        let later = store
            .list_for_user(user, Some(next_week() + Duration::days(1)))
            .await
            .unwrap();
        assert!(later.is_empty());
    }
}
