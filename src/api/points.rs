//! The signed-in user's points ledger.

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{Point, PointsSummary};

pub const SUMMARY_PATH: &str = "/users/me/points";
pub const HISTORY_PATH: &str = "/users/me/points/history";

pub async fn summary(client: &ApiClient) -> Result<PointsSummary, ApiError> {
    client.get_json(SUMMARY_PATH).await
}

pub async fn history(client: &ApiClient) -> Result<Vec<Point>, ApiError> {
    client.get_json(HISTORY_PATH).await
}
