//! Points screen: running total plus ledger history.

use super::record_error;
use crate::api::points;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{Point, PointsSummary};

const LOAD_FAILED: &str = "Failed to load points";

pub struct PointsPage {
    client: ApiClient,
    pub summary: Option<PointsSummary>,
    pub history: Vec<Point>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PointsPage {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client, summary: None, history: Vec::new(), loading: false, error: None }
    }

    /// Fetch summary and history concurrently; either failing marks the page.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;
        let (summary, history) = tokio::join!(points::summary(&self.client), points::history(&self.client));
        self.loading = false;

        let result = summary.and_then(|s| history.map(|h| (s, h)));
        match result {
            Ok((summary, history)) => {
                self.summary = Some(summary);
                self.history = history;
                Ok(())
            }
            Err(e) => {
                record_error(&mut self.error, &e, LOAD_FAILED);
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn total(&self) -> i64 {
        self.summary.as_ref().map_or(0, |s| s.total_points)
    }

    /// Sum of history entries with the given `action_type`.
    #[must_use]
    pub fn earned_from(&self, action_type: &str) -> i64 {
        self.history
            .iter()
            .filter(|p| p.action_type == action_type)
            .map(|p| p.amount)
            .sum()
    }
}
