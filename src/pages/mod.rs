//! Headless page models.
//!
//! DESIGN
//! ======
//! A page model owns the list a screen shows plus its local `loading`,
//! `pending` and `error` flags, and calls the resource modules directly.
//! Errors are caught at the call site: the display message lands in `error`
//! and the `ApiError` is still returned so the caller can keep a form open.
//! Authorization failures are the exception. They leave `error` untouched
//! because the unauthorized-redirect subscriber moves the user to `/login`.

pub mod dashboard;
pub mod events;
pub mod goals;
pub mod logs;
pub mod nav;
pub mod points;
pub mod projects;


use crate::error::ApiError;
use crate::forms::FieldErrors;
use crate::models::{Event, Goal, Log, Project};

pub const REQUEST_FAILED: &str = "Request failed";

/// Why a form submission did not reach or satisfy the backend.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("form invalid: {0}")]
    Invalid(#[from] FieldErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Records that can be located in a list by their server id.
pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),+) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

identified!(Goal, Log, Event, Project);

/// List screen state shared by every resource page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub loading: bool,
    /// A create form is being submitted.
    pub creating: bool,
    /// Id of the item an in-flight update or delete targets.
    pub pending_id: Option<String>,
    pub error: Option<String>,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self { items: Vec::new(), loading: false, creating: false, pending_id: None, error: None }
    }
}

impl<T: Identified> ListPage<T> {
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Newly created items go first, matching the backend's newest-first ordering.
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    pub fn replace(&mut self, item: T) {
        if let Some(slot) = self.items.iter_mut().find(|slot| slot.id() == item.id()) {
            *slot = item;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id() != id);
    }

    /// Store `err` for display unless it is an authorization failure.
    pub fn record_error(&mut self, err: &ApiError, fallback: &str) {
        record_error(&mut self.error, err, fallback);
    }

    /// Run a list fetch, replacing `items` on success.
    pub async fn load_with<F>(&mut self, fetch: F, fallback: &str) -> Result<(), ApiError>
    where
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        self.loading = true;
        self.error = None;
        let result = fetch.await;
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(e) => {
                self.record_error(&e, fallback);
                Err(e)
            }
        }
    }
}

/// Shared by pages that keep their error outside a `ListPage`.
pub(crate) fn record_error(slot: &mut Option<String>, err: &ApiError, fallback: &str) {
    if err.is_unauthorized() {
        tracing::debug!(status = ?err.status(), "authorization failure left to redirect subscriber");
        return;
    }
    *slot = Some(err.display_message(fallback));
}
