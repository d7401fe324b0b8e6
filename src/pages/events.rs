use std::collections::HashSet;

use super::{ListPage, SubmitError};
use crate::api::events;
use crate::error::ApiError;
use crate::forms::EventForm;
use crate::http::ApiClient;
use crate::models::{Event, EventParticipant, JoinReceipt};

const LOAD_FAILED: &str = "Failed to load events";
const CREATE_FAILED: &str = "Failed to create event";
const JOIN_FAILED: &str = "Failed to join event";
const LEAVE_FAILED: &str = "Failed to leave event";

pub struct EventsPage {
    client: ApiClient,
    pub list: ListPage<Event>,
    /// Events joined from this screen.
    pub joined: HashSet<String>,
}

impl EventsPage {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client, list: ListPage::default(), joined: HashSet::new() }
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        let fetch = events::list(&self.client);
        self.list.load_with(fetch, LOAD_FAILED).await
    }

    pub async fn create(&mut self, form: &EventForm) -> Result<Event, SubmitError> {
        let new_event = form.validate()?;
        self.list.creating = true;
        self.list.error = None;
        let result = events::create(&self.client, &new_event).await;
        self.list.creating = false;
        match result {
            Ok(event) => {
                self.list.prepend(event.clone());
                Ok(event)
            }
            Err(e) => {
                self.list.record_error(&e, CREATE_FAILED);
                Err(e.into())
            }
        }
    }

    pub async fn join(&mut self, event_id: &str) -> Result<JoinReceipt, ApiError> {
        self.list.pending_id = Some(event_id.to_owned());
        self.list.error = None;
        let result = events::join(&self.client, event_id).await;
        self.list.pending_id = None;
        match result {
            Ok(receipt) => {
                self.joined.insert(event_id.to_owned());
                Ok(receipt)
            }
            Err(e) => {
                self.list.record_error(&e, JOIN_FAILED);
                Err(e)
            }
        }
    }

    pub async fn leave(&mut self, event_id: &str) -> Result<(), ApiError> {
        self.list.pending_id = Some(event_id.to_owned());
        self.list.error = None;
        let result = events::leave(&self.client, event_id).await;
        self.list.pending_id = None;
        match result {
            Ok(()) => {
                self.joined.remove(event_id);
                Ok(())
            }
            Err(e) => {
                self.list.record_error(&e, LEAVE_FAILED);
                Err(e)
            }
        }
    }

    pub async fn participants(&mut self, event_id: &str) -> Result<Vec<EventParticipant>, ApiError> {
        events::participants(&self.client, event_id)
            .await
            .inspect_err(|e| self.list.record_error(e, LOAD_FAILED))
    }

    #[must_use]
    pub fn has_joined(&self, event_id: &str) -> bool {
        self.joined.contains(event_id)
    }
}
