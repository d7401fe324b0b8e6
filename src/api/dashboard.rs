use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::Dashboard;

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Server-side aggregate of the personal and community areas.
pub async fn fetch(client: &ApiClient) -> Result<Dashboard, ApiError> {
    client.get_json(DASHBOARD_PATH).await
}
