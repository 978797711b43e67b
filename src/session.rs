//! Session state and its durable mirror.
//!
//! OWNERSHIP
//! =========
//! The [`SessionStore`] is the sole owner of credential state. The gateway
//! reads it at send time and replaces the token pair after a refresh; explicit
//! login/logout flows go through `set`/`clear`. Everything else only reads.
//!
//! PERSISTENCE
//! ===========
//! Three fields survive a restart: `userId`, `accessToken`, `refreshToken`.
//! Display fields (`username`, `profileImage`) are in-memory only and get
//! refetched from `/users/{id}` after a restore. Storage failures degrade to
//! "logged out" and are logged, never surfaced.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// SESSION
// =============================================================================

/// Display identity of the authenticated user. Denormalized from the server;
/// the server stays the source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Server-assigned user id.
    pub user_id: String,
    /// Display name; absent after a restore until refetched.
    pub username: Option<String>,
    /// Profile image URL, if set.
    pub profile_image: Option<String>,
}

/// An authenticated session. Holds both tokens by construction; "logged out"
/// is the absence of a `Session`, never a half-empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Short-lived bearer credential attached to API calls.
    pub access_token: String,
    /// Long-lived credential used only to mint a new access token.
    pub refresh_token: String,
    /// Cached display identity.
    pub identity: Identity,
}

// =============================================================================
// PERSISTENCE
// =============================================================================

/// The three fields mirrored to durable storage, under their fixed wire keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Durable mirror for the session, consulted once at startup and written on
/// every token replacement. Implementations must treat partial or unreadable
/// state as absent.
pub trait SessionPersist: Send + Sync {
    /// Load the persisted session, if all required fields are present.
    fn load(&self) -> Option<PersistedSession>;
    /// Replace the persisted session wholesale.
    fn save(&self, session: &PersistedSession);
    /// Remove all persisted fields.
    fn clear(&self);
}

/// JSON-file persistence at a fixed path.
pub struct FileSessionPersist {
    path: PathBuf,
}

impl FileSessionPersist {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionPersist for FileSessionPersist {
    fn load(&self) -> Option<PersistedSession> {
        let bytes = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "session file unreadable; treating as logged out");
                None
            }
        }
    }

    fn save(&self, session: &PersistedSession) {
        match serde_json::to_vec_pretty(session) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&self.path, bytes) {
                    tracing::warn!(error = %e, path = %self.path.display(), "failed to persist session");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode session for persistence");
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to remove persisted session");
            }
        }
    }
}

/// In-process persistence for tests and embedding.
#[derive(Default)]
pub struct MemorySessionPersist {
    slot: Mutex<Option<PersistedSession>>,
}

impl MemorySessionPersist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPersist for MemorySessionPersist {
    fn load(&self) -> Option<PersistedSession> {
        lock(&self.slot).clone()
    }

    fn save(&self, session: &PersistedSession) {
        *lock(&self.slot) = Some(session.clone());
    }

    fn clear(&self) {
        *lock(&self.slot) = None;
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Process-wide session state. Cheap to clone; all clones share one slot.
#[derive(Clone)]
pub struct SessionStore {
    current: Arc<Mutex<Option<Session>>>,
    persist: Arc<dyn SessionPersist>,
}

impl SessionStore {
    /// Build a store seeded from durable storage. Absence of any persisted
    /// field means logged out, not an error.
    #[must_use]
    pub fn restore(persist: Arc<dyn SessionPersist>) -> Self {
        let current = persist.load().map(|p| Session {
            access_token: p.access_token,
            refresh_token: p.refresh_token,
            identity: Identity { user_id: p.user_id, username: None, profile_image: None },
        });
        if current.is_some() {
            tracing::info!("session restored from storage");
        }
        Self { current: Arc::new(Mutex::new(current)), persist }
    }

    /// Current session snapshot, if logged in.
    #[must_use]
    pub fn snapshot(&self) -> Option<Session> {
        lock(&self.current).clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        lock(&self.current).is_some()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        lock(&self.current).as_ref().map(|s| s.access_token.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        lock(&self.current).as_ref().map(|s| s.refresh_token.clone())
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        lock(&self.current).as_ref().map(|s| s.identity.user_id.clone())
    }

    /// Replace the session wholesale and mirror the change to durable storage.
    /// `None` clears everything (logout).
    pub fn set(&self, session: Option<Session>) {
        match &session {
            Some(s) => self.persist.save(&PersistedSession {
                user_id: s.identity.user_id.clone(),
                access_token: s.access_token.clone(),
                refresh_token: s.refresh_token.clone(),
            }),
            None => self.persist.clear(),
        }
        *lock(&self.current) = session;
    }

    /// Clear the session and its persisted mirror.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Update the cached display name. No-op when logged out; never touches
    /// tokens or durable storage.
    pub fn set_username(&self, username: &str) {
        if let Some(session) = lock(&self.current).as_mut() {
            session.identity.username = Some(username.to_owned());
        }
    }

    /// Update the cached profile image URL. Same rules as [`Self::set_username`].
    pub fn set_profile_image(&self, profile_image: &str) {
        if let Some(session) = lock(&self.current).as_mut() {
            session.identity.profile_image = Some(profile_image.to_owned());
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
