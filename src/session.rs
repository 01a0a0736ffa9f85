//! Per-client session state.
//!
//! A session is identified by a random UUID carried in the session cookie.
//! Its data is loaded from a [`SessionStore`] at the start of a request and
//! saved back with the configured expiry once the handler is done with it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};
use tokio::{sync::RwLock, time::Instant};
use uuid::Uuid;

use crate::error::AppResult;

/// Data kept for one client across requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Number of home page visits recorded so far
    #[serde(default)]
    pub num_visits: i64,
}

/// A session opened for the duration of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub data: SessionData,
}

impl Session {
    /// Fresh session with a newly drawn id and zeroed data
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            data: SessionData::default(),
        }
    }

    /// Count one visit and return the count as it was before this visit.
    pub fn record_visit(&mut self) -> i64 {
        let previous = self.data.num_visits;
        self.data.num_visits += 1;
        previous
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Backend persisting session data between requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Data for `id`, or `None` when unknown or expired
    async fn load(&self, id: Uuid) -> AppResult<Option<SessionData>>;
    /// Store `data` under `id`, replacing any previous value, for `ttl`
    async fn save(&self, id: Uuid, data: &SessionData, ttl: Duration) -> AppResult<()>;
}

/// Open the session named by the client's cookie, minting a new one when the
/// cookie is absent or the stored session is gone.
pub async fn open(store: &dyn SessionStore, id: Option<Uuid>) -> AppResult<Session> {
    if let Some(id) = id {
        if let Some(data) = store.load(id).await? {
            return Ok(Session { id, data });
        }
        tracing::debug!("Session {} unknown or expired, starting a new one", id);
    }
    Ok(Session::new())
}

/// In-process session store; sessions are lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, (SessionData, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: Uuid) -> AppResult<Option<SessionData>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&id)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(data, _)| data.clone()))
    }

    async fn save(&self, id: Uuid, data: &SessionData, ttl: Duration) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(id, (data.clone(), now + ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use mockall::predicate::eq;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_record_visit_returns_previous_count() {
        let mut session = Session::new();
        assert_eq!(session.record_visit(), 0);
        assert_eq!(session.record_visit(), 1);
        assert_eq!(session.data.num_visits, 2);
    }

    #[tokio::test]
    async fn test_open_without_cookie_mints_session() {
        let mut store = MockSessionStore::new();
        store.expect_load().never();

        let session = open(&store, None).await.unwrap();
        assert_eq!(session.data, SessionData::default());
    }

    #[tokio::test]
    async fn test_open_existing_session() {
        let id = Uuid::new_v4();
        let mut store = MockSessionStore::new();
        store
            .expect_load()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(Some(SessionData { num_visits: 4 })));

        let session = open(&store, Some(id)).await.unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.data.num_visits, 4);
    }

    #[tokio::test]
    async fn test_open_unknown_session_starts_over() {
        let stale = Uuid::new_v4();
        let mut store = MockSessionStore::new();
        store.expect_load().returning(|_| Ok(None));

        let session = open(&store, Some(stale)).await.unwrap();
        assert_ne!(session.id, stale);
        assert_eq!(session.data.num_visits, 0);
    }

    #[tokio::test]
    async fn test_open_propagates_store_failure() {
        let mut store = MockSessionStore::new();
        store
            .expect_load()
            .returning(|_| Err(AppError::Session("connection refused".to_string())));

        let err = open(&store, Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AppError::Session(_)));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        let id = Uuid::new_v4();
        assert_eq!(store.load(id).await.unwrap(), None);

        store.save(id, &SessionData { num_visits: 3 }, TTL).await.unwrap();
        assert_eq!(
            store.load(id).await.unwrap(),
            Some(SessionData { num_visits: 3 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_expires_sessions() {
        let store = MemorySessionStore::new();
        let id = Uuid::new_v4();
        store.save(id, &SessionData { num_visits: 1 }, TTL).await.unwrap();

        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        assert_eq!(store.load(id).await.unwrap(), None);
    }
}
