//! Community events, including attendance.

use crate::error::ApiError;
use crate::http::{ApiClient, resource_path};
use crate::models::{Event, EventParticipant, EventPatch, JoinReceipt, NewEvent};

pub const COLLECTION: &str = "/events";

#[must_use]
pub fn event_path(event_id: &str) -> String {
    resource_path(COLLECTION, &[event_id])
}

#[must_use]
pub fn join_path(event_id: &str) -> String {
    resource_path(COLLECTION, &[event_id, "join"])
}

#[must_use]
pub fn leave_path(event_id: &str) -> String {
    resource_path(COLLECTION, &[event_id, "leave"])
}

#[must_use]
pub fn participants_path(event_id: &str) -> String {
    resource_path(COLLECTION, &[event_id, "participants"])
}

pub async fn list(client: &ApiClient) -> Result<Vec<Event>, ApiError> {
    client.get_json(COLLECTION).await
}

pub async fn get(client: &ApiClient, event_id: &str) -> Result<Event, ApiError> {
    client.get_json(&event_path(event_id)).await
}

pub async fn create(client: &ApiClient, event: &NewEvent) -> Result<Event, ApiError> {
    client.post_json(COLLECTION, event).await
}

pub async fn update(client: &ApiClient, event_id: &str, patch: &EventPatch) -> Result<Event, ApiError> {
    client.patch_json(&event_path(event_id), patch).await
}

pub async fn delete(client: &ApiClient, event_id: &str) -> Result<(), ApiError> {
    client.delete(&event_path(event_id)).await
}

/// Join an event. The backend rejects a second join with 400 `Already joined this event`.
pub async fn join(client: &ApiClient, event_id: &str) -> Result<JoinReceipt, ApiError> {
    client.post_action(&join_path(event_id)).await
}

pub async fn leave(client: &ApiClient, event_id: &str) -> Result<(), ApiError> {
    client.delete(&leave_path(event_id)).await
}

/// Currently joined participants, most recent first.
pub async fn participants(client: &ApiClient, event_id: &str) -> Result<Vec<EventParticipant>, ApiError> {
    client.get_json(&participants_path(event_id)).await
}
