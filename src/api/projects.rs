use crate::error::ApiError;
use crate::http::{ApiClient, resource_path};
use crate::models::{JoinReceipt, NewProject, Project, ProjectPatch};

pub const COLLECTION: &str = "/projects";

#[must_use]
pub fn project_path(project_id: &str) -> String {
    resource_path(COLLECTION, &[project_id])
}

#[must_use]
pub fn join_path(project_id: &str) -> String {
    resource_path(COLLECTION, &[project_id, "join"])
}

pub async fn list(client: &ApiClient) -> Result<Vec<Project>, ApiError> {
    client.get_json(COLLECTION).await
}

pub async fn get(client: &ApiClient, project_id: &str) -> Result<Project, ApiError> {
    client.get_json(&project_path(project_id)).await
}

pub async fn create(client: &ApiClient, project: &NewProject) -> Result<Project, ApiError> {
    client.post_json(COLLECTION, project).await
}

pub async fn update(client: &ApiClient, project_id: &str, patch: &ProjectPatch) -> Result<Project, ApiError> {
    client.patch_json(&project_path(project_id), patch).await
}

pub async fn delete(client: &ApiClient, project_id: &str) -> Result<(), ApiError> {
    client.delete(&project_path(project_id)).await
}

/// Request membership. Membership is approval-based, so the receipt status is `pending`.
pub async fn join(client: &ApiClient, project_id: &str) -> Result<JoinReceipt, ApiError> {
    client.post_action(&join_path(project_id)).await
}
