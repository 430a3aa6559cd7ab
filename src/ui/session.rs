use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use super::AdminState;
use crate::auth::Principal;

pub struct Session {
    /// Credential the admin signed in with; re-verified on every action.
    pub credential: String,
    pub principal: Principal,
    pub view: AdminState,
    last_seen: Instant,
}

/// Signed-in dashboard sessions keyed by the id held in the session cookie.
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn create(&self, credential: String, principal: Principal) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                credential,
                principal,
                view: AdminState::new(),
                last_seen: Instant::now(),
            },
        );
        id
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn credential(&self, id: &Uuid) -> Option<String> {
        self.sessions.get_mut(id).map(|mut session| {
            session.last_seen = Instant::now();
            session.credential.clone()
        })
    }

    pub fn principal(&self, id: &Uuid) -> Option<Principal> {
        self.sessions.get(id).map(|session| session.principal.clone())
    }

    /// Run `f` against the session's view state. Never hold the result across an await.
    pub fn with_view<R>(&self, id: &Uuid, f: impl FnOnce(&mut AdminState) -> R) -> Option<R> {
        self.sessions.get_mut(id).map(|mut session| f(&mut session.view))
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle for longer than `max_idle`.
    pub fn cleanup(&self, max_idle: Duration) {
        let now = Instant::now();
        self.sessions
            .retain(|_, session| now.duration_since(session.last_seen) < max_idle);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
