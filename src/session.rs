//! Session service: who is signed in, and the actions that change it.
//!
//! DESIGN
//! ======
//! State is one explicit [`SessionState`] published through a
//! `tokio::sync::watch` channel, so a loading session can never also carry a
//! stale user. Each `Session` is an independent instance built from an
//! [`ApiClient`] and a [`UserStore`]; nothing is global.
//!
//! PERSISTENCE
//! ===========
//! Only the user survives a restart. Entering `Authenticated` saves it,
//! entering `Anonymous` clears it, and the transient states leave the stored
//! entry untouched.
//!
//! CONCURRENCY
//! ===========
//! Overlapping actions are not serialized. Whichever transition is sent last
//! wins, e.g. a `logout` racing a slow `login` may be overwritten when the
//! login completes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::auth;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{RegisterRequest, User};
use crate::storage::UserStore;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    /// An auth action is in flight.
    Authenticating,
    Authenticated(User),
    /// The last login/register failed with this display message.
    Failed(String),
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Authenticating)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

pub struct Session {
    client: ApiClient,
    users: Arc<dyn UserStore>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// New session; a persisted user is restored as `Authenticated` without a network call.
    #[must_use]
    pub fn new(client: ApiClient, users: Arc<dyn UserStore>) -> Self {
        let initial = users
            .load()
            .map_or(SessionState::Anonymous, SessionState::Authenticated);
        let (state, _) = watch::channel(initial);
        Self { client, users, state }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error().map(str::to_owned)
    }

    fn transition(&self, next: SessionState) {
        match &next {
            SessionState::Authenticated(user) => self.users.save(user),
            SessionState::Anonymous => self.users.clear(),
            SessionState::Authenticating | SessionState::Failed(_) => {}
        }
        self.state.send_replace(next);
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Log in, then load the account. On failure the display message is
    /// recorded as `Failed` and the error is still returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        self.transition(SessionState::Authenticating);
        let result = async {
            auth::login(&self.client, email, password).await?;
            auth::current_user(&self.client).await
        }
        .await;
        self.settle(result, LOGIN_FAILED, "login")
    }

    /// Register, log in with the same credentials, then load the account.
    pub async fn register(&self, full_name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        self.transition(SessionState::Authenticating);
        let request = RegisterRequest {
            full_name: full_name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let result = async {
            auth::register(&self.client, &request).await?;
            auth::login(&self.client, email, password).await?;
            auth::current_user(&self.client).await
        }
        .await;
        self.settle(result, REGISTRATION_FAILED, "register")
    }

    fn settle(&self, result: Result<User, ApiError>, fallback: &str, action: &str) -> Result<User, ApiError> {
        match result {
            Ok(user) => {
                tracing::info!(action, user_id = %user.id, "session authenticated");
                self.transition(SessionState::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                let message = e.display_message(fallback);
                tracing::info!(action, code = e.error_code(), %message, "session action failed");
                self.transition(SessionState::Failed(message));
                Err(e)
            }
        }
    }

    /// Drop the token and forget the user. Local only.
    pub fn logout(&self) {
        auth::logout(&self.client);
        tracing::info!("session logged out");
        self.transition(SessionState::Anonymous);
    }

    /// Reconcile the session with the stored token.
    ///
    /// Without a token this settles on `Anonymous` and issues no request. With
    /// one, any failure (expired or revoked token included) silently settles on
    /// `Anonymous` rather than `Failed`.
    pub async fn fetch_current_user(&self) -> Option<User> {
        if !auth::is_authenticated(&self.client) {
            self.transition(SessionState::Anonymous);
            return None;
        }
        self.transition(SessionState::Authenticating);
        match auth::current_user(&self.client).await {
            Ok(user) => {
                self.transition(SessionState::Authenticated(user.clone()));
                Some(user)
            }
            Err(e) => {
                tracing::debug!(code = e.error_code(), "session restore failed; continuing anonymous");
                self.transition(SessionState::Anonymous);
                None
            }
        }
    }

    /// Leave `Failed` for `Anonymous`; any other state is kept.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, SessionState::Failed(_)) {
                *state = SessionState::Anonymous;
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
