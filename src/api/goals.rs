use crate::error::ApiError;
use crate::http::{ApiClient, resource_path};
use crate::models::{Goal, GoalPatch, NewGoal};

pub const COLLECTION: &str = "/goals";

#[must_use]
pub fn goal_path(goal_id: &str) -> String {
    resource_path(COLLECTION, &[goal_id])
}

pub async fn list(client: &ApiClient) -> Result<Vec<Goal>, ApiError> {
    client.get_json(COLLECTION).await
}

pub async fn get(client: &ApiClient, goal_id: &str) -> Result<Goal, ApiError> {
    client.get_json(&goal_path(goal_id)).await
}

pub async fn create(client: &ApiClient, goal: &NewGoal) -> Result<Goal, ApiError> {
    client.post_json(COLLECTION, goal).await
}

pub async fn update(client: &ApiClient, goal_id: &str, patch: &GoalPatch) -> Result<Goal, ApiError> {
    client.patch_json(&goal_path(goal_id), patch).await
}

pub async fn delete(client: &ApiClient, goal_id: &str) -> Result<(), ApiError> {
    client.delete(&goal_path(goal_id)).await
}
