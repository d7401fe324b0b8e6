//! Reflection log screen: own and public logs.

use super::{ListPage, SubmitError};
use crate::api::logs;
use crate::error::ApiError;
use crate::forms::LogForm;
use crate::http::ApiClient;
use crate::models::{Log, LogVisibility};

const LOAD_FAILED: &str = "Failed to load logs";
const CREATE_FAILED: &str = "Failed to create log";
const DELETE_FAILED: &str = "Failed to delete log";

pub struct LogsPage {
    client: ApiClient,
    pub list: ListPage<Log>,
}

impl LogsPage {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client, list: ListPage::default() }
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        let fetch = logs::list(&self.client);
        self.list.load_with(fetch, LOAD_FAILED).await
    }

    pub async fn create(&mut self, form: &LogForm) -> Result<Log, SubmitError> {
        let new_log = form.validate()?;
        self.list.creating = true;
        self.list.error = None;
        let result = logs::create(&self.client, &new_log).await;
        self.list.creating = false;
        match result {
            Ok(log) => {
                self.list.prepend(log.clone());
                Ok(log)
            }
            Err(e) => {
                self.list.record_error(&e, CREATE_FAILED);
                Err(e.into())
            }
        }
    }

    pub async fn delete(&mut self, log_id: &str) -> Result<(), ApiError> {
        self.list.pending_id = Some(log_id.to_owned());
        self.list.error = None;
        let result = logs::delete(&self.client, log_id).await;
        self.list.pending_id = None;
        match result {
            Ok(()) => {
                self.list.remove(log_id);
                Ok(())
            }
            Err(e) => {
                self.list.record_error(&e, DELETE_FAILED);
                Err(e)
            }
        }
    }

    /// Logs written by `user_id`, whatever their visibility.
    #[must_use]
    pub fn mine(&self, user_id: &str) -> Vec<&Log> {
        self.list.items.iter().filter(|l| l.user_id == user_id).collect()
    }

    /// Public logs written by anyone else.
    #[must_use]
    pub fn community(&self, user_id: &str) -> Vec<&Log> {
        self.list
            .items
            .iter()
            .filter(|l| l.visibility == LogVisibility::Public && l.user_id != user_id)
            .collect()
    }
}
