//! Steps are created under their goal and addressed directly afterwards.

use crate::error::ApiError;
use crate::http::{ApiClient, resource_path};
use crate::models::{NewStep, Step, StepPatch};

#[must_use]
pub fn goal_steps_path(goal_id: &str) -> String {
    resource_path("/goals", &[goal_id, "steps"])
}

#[must_use]
pub fn step_path(step_id: &str) -> String {
    resource_path("/steps", &[step_id])
}

#[must_use]
pub fn complete_path(step_id: &str) -> String {
    resource_path("/steps", &[step_id, "complete"])
}

pub async fn create(client: &ApiClient, goal_id: &str, step: &NewStep) -> Result<Step, ApiError> {
    client.post_json(&goal_steps_path(goal_id), step).await
}

pub async fn update(client: &ApiClient, step_id: &str, patch: &StepPatch) -> Result<Step, ApiError> {
    client.patch_json(&step_path(step_id), patch).await
}

/// Mark a step completed; the backend stamps `completed_at` and awards points.
pub async fn complete(client: &ApiClient, step_id: &str) -> Result<Step, ApiError> {
    client.post_action(&complete_path(step_id)).await
}

pub async fn delete(client: &ApiClient, step_id: &str) -> Result<(), ApiError> {
    client.delete(&step_path(step_id)).await
}
