use crate::error::ApiError;
use crate::http::{ApiClient, resource_path};
use crate::models::{ProfilePatch, UserProfile};

pub const MY_PROFILE_PATH: &str = "/users/me/profile";

#[must_use]
pub fn profile_path(user_id: &str) -> String {
    resource_path("/users", &[user_id, "profile"])
}

pub async fn my_profile(client: &ApiClient) -> Result<UserProfile, ApiError> {
    client.get_json(MY_PROFILE_PATH).await
}

pub async fn update_my_profile(client: &ApiClient, patch: &ProfilePatch) -> Result<UserProfile, ApiError> {
    client.patch_json(MY_PROFILE_PATH, patch).await
}

pub async fn profile(client: &ApiClient, user_id: &str) -> Result<UserProfile, ApiError> {
    client.get_json(&profile_path(user_id)).await
}
