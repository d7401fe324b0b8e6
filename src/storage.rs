//! Client-side persistence: the bearer-token cookie and the persisted session entry.
//!
//! SYSTEM CONTEXT
//! ==============
//! Exactly two things survive between runs: the `access_token` cookie (seven
//! day expiry, one active token per profile) and the `auth-storage` entry,
//! which holds only the last known `User`. Both sit behind small traits so the
//! HTTP client, session and route guard can be tested against in-memory
//! stores, while the CLI uses the file-backed ones.
//!
//! ERROR HANDLING
//! ==============
//! Cookie-style access never fails from the caller's point of view. File
//! read/write problems are logged with `tracing` and treated as "absent".

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::models::User;

pub const TOKEN_COOKIE_NAME: &str = "access_token";
pub const SESSION_STORAGE_NAME: &str = "auth-storage";
pub const TOKEN_TTL: Duration = Duration::days(7);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage payload invalid: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// TOKEN COOKIE
// =============================================================================

/// A stored bearer token with its absolute expiry (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCookie {
    pub value: String,
    pub expires_at: i64,
}

impl TokenCookie {
    /// Cookie for `value` expiring [`TOKEN_TTL`] after `now`.
    #[must_use]
    pub fn issue(value: &str, now: OffsetDateTime) -> Self {
        Self { value: value.to_owned(), expires_at: (now + TOKEN_TTL).unix_timestamp() }
    }

    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now.unix_timestamp() >= self.expires_at
    }
}

/// Storage for the single active bearer token.
pub trait TokenStore: Send + Sync {
    /// The token, or `None` when absent or expired.
    fn get(&self) -> Option<String>;
    /// Store `token`, replacing any previous one, with a fresh expiry.
    fn set(&self, token: &str);
    fn remove(&self);

    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    cookie: Mutex<Option<TokenCookie>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `cookie`, e.g. one that has already expired.
    #[must_use]
    pub fn with_cookie(cookie: TokenCookie) -> Self {
        Self { cookie: Mutex::new(Some(cookie)) }
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self::with_cookie(TokenCookie::issue(token, OffsetDateTime::now_utc()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        let mut slot = self.cookie.lock().unwrap_or_else(PoisonError::into_inner);
        if slot
            .as_ref()
            .is_some_and(|cookie| cookie.is_expired_at(OffsetDateTime::now_utc()))
        {
            *slot = None;
        }
        slot.as_ref().map(|cookie| cookie.value.clone())
    }

    fn set(&self, token: &str) {
        let cookie = TokenCookie::issue(token, OffsetDateTime::now_utc());
        *self.cookie.lock().unwrap_or_else(PoisonError::into_inner) = Some(cookie);
    }

    fn remove(&self) {
        *self.cookie.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Token cookie persisted as `<dir>/access_token.json`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self { path: dir.join(format!("{TOKEN_COOKIE_NAME}.json")) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let cookie = match read_json::<TokenCookie>(&self.path) {
            Ok(cookie) => cookie?,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable token cookie; ignoring");
                return None;
            }
        };
        if cookie.is_expired_at(OffsetDateTime::now_utc()) {
            tracing::debug!("token cookie expired; purging");
            self.remove();
            return None;
        }
        Some(cookie.value)
    }

    fn set(&self, token: &str) {
        let cookie = TokenCookie::issue(token, OffsetDateTime::now_utc());
        if let Err(e) = write_json(&self.path, &cookie) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist token cookie");
        }
    }

    fn remove(&self) {
        remove_file(&self.path);
    }
}

// =============================================================================
// PERSISTED SESSION ENTRY
// =============================================================================

/// Persistence for the session's `user` field. Nothing else is persisted.
pub trait UserStore: Send + Sync {
    fn load(&self) -> Option<User>;
    fn save(&self, user: &User);
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    user: Mutex<Option<User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(user: User) -> Self {
        Self { user: Mutex::new(Some(user)) }
    }
}

impl UserStore for MemoryUserStore {
    fn load(&self) -> Option<User> {
        self.user.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn save(&self, user: &User) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
    }

    fn clear(&self) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    user: Option<User>,
}

/// Session entry persisted as `<dir>/auth-storage.json`.
#[derive(Debug, Clone)]
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self { path: dir.join(format!("{SESSION_STORAGE_NAME}.json")) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UserStore for FileUserStore {
    fn load(&self) -> Option<User> {
        match read_json::<PersistedSession>(&self.path) {
            Ok(entry) => entry.and_then(|e| e.user),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable session entry; ignoring");
                None
            }
        }
    }

    fn save(&self, user: &User) {
        let entry = PersistedSession { user: Some(user.clone()) };
        if let Err(e) = write_json(&self.path, &entry) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist session entry");
        }
    }

    fn clear(&self) {
        remove_file(&self.path);
    }
}

// =============================================================================
// FILE HELPERS
// =============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(value)?;
    std::fs::write(path, raw)?;
    Ok(())
}

fn remove_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove stored file"),
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
