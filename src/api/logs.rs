use crate::error::ApiError;
use crate::http::{ApiClient, resource_path};
use crate::models::{Log, LogPatch, LogVisibility, NewLog};

pub const COLLECTION: &str = "/logs";

/// Optional server-side filters for the log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub visibility: Option<LogVisibility>,
    pub tag: Option<String>,
}

impl LogFilter {
    /// Query pairs for the filters that are set.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(visibility) = self.visibility {
            pairs.push(("visibility", visibility.as_str()));
        }
        if let Some(tag) = self.tag.as_deref() {
            pairs.push(("tag", tag));
        }
        pairs
    }
}

#[must_use]
pub fn log_path(log_id: &str) -> String {
    resource_path(COLLECTION, &[log_id])
}

/// Own logs plus everyone's public logs, newest first.
pub async fn list(client: &ApiClient) -> Result<Vec<Log>, ApiError> {
    client.get_json(COLLECTION).await
}

pub async fn list_filtered(client: &ApiClient, filter: &LogFilter) -> Result<Vec<Log>, ApiError> {
    client.get_json_with_query(COLLECTION, &filter.query()).await
}

pub async fn get(client: &ApiClient, log_id: &str) -> Result<Log, ApiError> {
    client.get_json(&log_path(log_id)).await
}

pub async fn create(client: &ApiClient, log: &NewLog) -> Result<Log, ApiError> {
    client.post_json(COLLECTION, log).await
}

pub async fn update(client: &ApiClient, log_id: &str, patch: &LogPatch) -> Result<Log, ApiError> {
    client.patch_json(&log_path(log_id), patch).await
}

pub async fn delete(client: &ApiClient, log_id: &str) -> Result<(), ApiError> {
    client.delete(&log_path(log_id)).await
}
