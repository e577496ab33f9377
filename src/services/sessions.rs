use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::{sync::RwLock, task::JoinHandle};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{SearchResetPolicy, SelectionError, SelectionEvent, SelectionState},
    services::{catalog::CatalogIndex, recommendations},
};

/// One user's interaction context
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub selection: SelectionState,
    /// Title currently searched, if any
    pub query: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Last time the session was read or updated
    pub last_seen: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            selection: SelectionState::new(),
            query: None,
            created_at: Utc::now(),
            last_seen: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() > ttl
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Switches the searched film; an empty query clears the search
    pub fn search(&mut self, query: &str, policy: SearchResetPolicy) -> AppResult<()> {
        let query = query.trim();
        self.query = (!query.is_empty()).then(|| query.to_string());
        self.transition(SelectionEvent::NewSearch(policy))
    }

    pub fn toggle_details(&mut self) -> AppResult<()> {
        self.transition(SelectionEvent::ToggleDetails)
    }

    /// Pins one of the recommendations currently shown for the searched film
    pub fn pin(&mut self, catalog: &CatalogIndex, limit: usize, title: &str) -> AppResult<()> {
        let query = self
            .query
            .as_deref()
            .ok_or_else(|| AppError::InvalidInput("No film searched in this session".to_string()))?;

        let film = catalog
            .find_by_title(query)
            .and_then(|(_, recommended)| {
                recommendations::find_recommendation(recommended, limit, title)
            })
            .ok_or_else(|| {
                AppError::NotFound(format!("{} is not among the recommendations for {}", title, query))
            })?;

        self.transition(SelectionEvent::PinRecommendation(film.clone()))
    }

    /// Closes the pinned recommendation; a close with nothing pinned is ignored
    pub fn close_pinned(&mut self) -> AppResult<()> {
        match self.selection.apply(SelectionEvent::ClosePinned) {
            Ok(next) => {
                self.selection = next;
                Ok(())
            }
            Err(SelectionError::NothingPinned) => {
                tracing::warn!(session_id = %self.id, "Close requested with nothing pinned, ignoring");
                Ok(())
            }
        }
    }

    fn transition(&mut self, event: SelectionEvent) -> AppResult<()> {
        self.selection = self
            .selection
            .apply(event)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Process-local session contexts, keyed by session id
///
/// Sessions idle for longer than the TTL are evicted: expired entries are purged on
/// every `create`, and a lookup of an expired session answers `SessionNotFound`.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, self.ttl);
        sessions.insert(session.id, session.clone());

        tracing::info!(session_id = %session.id, active = sessions.len(), "Session created");
        session
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Session> {
        let mut sessions = self.sessions.write().await;
        live_session(&mut sessions, id, self.ttl).map(|session| session.clone())
    }

    /// Applies `event` to a session and returns the updated session
    ///
    /// The session's selection is left unchanged when `event` fails.
    pub async fn update<F>(&self, id: Uuid, event: F) -> AppResult<Session>
    where
        F: FnOnce(&mut Session) -> AppResult<()>,
    {
        let mut sessions = self.sessions.write().await;
        let session = live_session(&mut sessions, id, self.ttl)?;

        let mut next = session.clone();
        event(&mut next)?;
        *session = next.clone();

        Ok(next)
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(AppError::SessionNotFound(id));
        }

        tracing::info!(session_id = %id, "Session closed");
        Ok(())
    }

    /// Drops every expired session, returning how many were removed
    pub async fn evict_expired(&self) -> usize {
        evict_expired(&mut *self.sessions.write().await, self.ttl)
    }

    /// Spawns a background task sweeping expired sessions every `period`
    pub fn spawn_eviction(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                store.evict_expired().await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn evict_expired(sessions: &mut HashMap<Uuid, Session>, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_expired(ttl));
    let evicted = before - sessions.len();

    if evicted > 0 {
        tracing::info!(evicted, active = sessions.len(), "Evicted idle sessions");
    }
    evicted
}

/// Looks up a session, dropping it if expired, and marks it as seen
fn live_session(
    sessions: &mut HashMap<Uuid, Session>,
    id: Uuid,
    ttl: Duration,
) -> AppResult<&mut Session> {
    if sessions.get(&id).is_some_and(|session| session.is_expired(ttl)) {
        sessions.remove(&id);
        tracing::info!(session_id = %id, "Session expired");
    }

    let session = sessions.get_mut(&id).ok_or(AppError::SessionNotFound(id))?;
    session.touch();
    Ok(session)
}
