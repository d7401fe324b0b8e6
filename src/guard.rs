//! Route guard and client-side navigation.
//!
//! DESIGN
//! ======
//! `check` is a pure decision over `(path, token present)` evaluated before
//! any page runs. `Navigator` owns the current location and applies `check`
//! on every move. Transport-level 401/403 handling reaches navigation only
//! through `spawn_unauthorized_redirect`, which listens for
//! [`AuthSignal`]s and sends the user to the login screen.
//!
//! Prefix matching is plain `starts_with` on the path, so `/goalsx` counts as
//! protected just like `/goals/1`.

use std::sync::Arc;

use reqwest::Url;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::http::AuthSignal;
use crate::storage::TokenStore;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const REDIRECT_PARAM: &str = "redirect";

/// Paths that require a token.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/goals", "/logs", "/events", "/projects", "/points"];
/// Paths only meaningful without a token.
pub const AUTH_PREFIXES: &[&str] = &[LOGIN_PATH, REGISTER_PATH];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Decide whether navigating to `location` must be redirected.
///
/// Only the path portion takes part in matching; query and fragment are ignored.
#[must_use]
pub fn check(location: &str, token_present: bool) -> GuardDecision {
    let path = path_of(location);
    if !token_present && matches_any(path, PROTECTED_PREFIXES) {
        GuardDecision::Redirect(login_redirect(path))
    } else if token_present && matches_any(path, AUTH_PREFIXES) {
        GuardDecision::Redirect(DASHBOARD_PATH.to_owned())
    } else {
        GuardDecision::Allow
    }
}

/// `/login?redirect=<path>`, form-encoded but keeping `/` literal so
/// `/dashboard` stays readable.
#[must_use]
pub fn login_redirect(path: &str) -> String {
    let Some(mut url) = resolve(LOGIN_PATH) else {
        return LOGIN_PATH.to_owned();
    };
    url.query_pairs_mut().clear().append_pair(REDIRECT_PARAM, path);
    // Form encoding only emits %2F for a literal slash.
    let query = url.query().unwrap_or_default().replace("%2F", "/");
    format!("{LOGIN_PATH}?{query}")
}

/// Where to go after a successful login from `location`.
///
/// Honors the `redirect` query parameter when it names an internal path,
/// otherwise falls back to the dashboard.
#[must_use]
pub fn post_login_destination(location: &str) -> String {
    resolve(location)
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == REDIRECT_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|target| target.starts_with('/') && !target.starts_with("//"))
        .unwrap_or_else(|| DASHBOARD_PATH.to_owned())
}

fn path_of(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

fn matches_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

/// Parse an in-app location against a placeholder origin.
fn resolve(location: &str) -> Option<Url> {
    Url::parse("http://app.invalid/").ok()?.join(location).ok()
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Current location plus guarded navigation.
pub struct Navigator {
    tokens: Arc<dyn TokenStore>,
    location: watch::Sender<String>,
}

impl Navigator {
    /// Start at `initial`, applying the guard to it.
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>, initial: &str) -> Self {
        let start = match check(initial, tokens.is_present()) {
            GuardDecision::Allow => initial.to_owned(),
            GuardDecision::Redirect(target) => target,
        };
        let (location, _) = watch::channel(start);
        Self { tokens, location }
    }

    #[must_use]
    pub fn location(&self) -> String {
        self.location.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }

    /// Navigate to `target` through the guard. Returns where the navigation landed.
    pub fn navigate(&self, target: &str) -> String {
        let landed = match check(target, self.tokens.is_present()) {
            GuardDecision::Allow => target.to_owned(),
            GuardDecision::Redirect(redirect) => {
                tracing::debug!(target, redirect = %redirect, "navigation redirected");
                redirect
            }
        };
        self.location.send_replace(landed.clone());
        landed
    }

    /// Unconditional move to the login screen, unless already there.
    pub fn force_login(&self) {
        self.location.send_if_modified(|location| {
            if path_of(location).starts_with(LOGIN_PATH) {
                false
            } else {
                *location = LOGIN_PATH.to_owned();
                true
            }
        });
    }
}

/// React to transport authorization failures by sending the navigator to `/login`.
///
/// The task ends when every `ApiClient` holding the sender is dropped.
pub fn spawn_unauthorized_redirect(
    mut signals: broadcast::Receiver<AuthSignal>,
    navigator: Arc<Navigator>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match signals.recv().await {
                Ok(AuthSignal::Unauthorized { status, path }) => {
                    tracing::info!(status, path, "unauthorized; redirecting to login");
                    navigator.force_login();
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "unauthorized signals lagged; redirecting to login");
                    navigator.force_login();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
