//! In-memory session table
//!
//! Sessions are created on first contact, refreshed on every request that
//! presents a known id, and dropped by [`SessionStore::sweep`] once they have
//! been idle longer than the configured window.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated session ids.
pub const SESSION_ID_LEN: usize = 32;

/// Idle window after which a session is swept.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
struct Entry {
    created_at: DateTime<Utc>,
    created: Instant,
    last_access: Instant,
}

/// Snapshot of a session as seen by one request.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// Wall-clock creation time, reported by the API.
    pub created_at: DateTime<Utc>,
    created: Instant,
    pub last_access: Instant,
}

impl Session {
    fn from_entry(id: &str, entry: &Entry) -> Self {
        Self {
            id: id.to_string(),
            created_at: entry.created_at,
            created: entry.created,
            last_access: entry.last_access,
        }
    }

    /// Time since the session was created. Grows across refreshes.
    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }
}

/// Thread-safe session table.
///
/// Every read and write goes through one reader/writer lock; readers run
/// concurrently, writers are exclusive. The map itself is never handed out.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Returns the session if it is still in the table.
    pub fn lookup(&self, id: &str) -> Option<Session> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(id).map(|entry| Session::from_entry(id, entry))
    }

    /// Creates a session under a fresh random id.
    ///
    /// Collisions are not checked: 62^32 ids leave nothing to guard against.
    pub fn create(&self) -> Session {
        let id = generate_session_id();
        let now = Instant::now();
        let entry = Entry {
            created_at: Utc::now(),
            created: now,
            last_access: now,
        };

        let session = Session::from_entry(&id, &entry);
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, entry);

        tracing::debug!(session = %session.id, "Session created");
        session
    }

    /// Marks the session as accessed now. Returns `None` if it is gone.
    pub fn refresh(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions.get_mut(id)?;
        entry.last_access = Instant::now();
        Some(Session::from_entry(id, entry))
    }

    /// Resolves the caller's session from its cookie id, creating one when
    /// the id is missing or unknown. The flag is true for new sessions.
    pub fn resume(&self, id: Option<&str>) -> (Session, bool) {
        if let Some(id) = id {
            if self.lookup(id).is_some() {
                if let Some(session) = self.refresh(id) {
                    return (session, false);
                }
            }
        }
        (self.create(), true)
    }

    /// Removes every session idle for longer than the window.
    /// Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_access) <= idle_timeout);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
