use serde::{Deserialize, Serialize};

/// One entry of the points ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    /// Machine-readable reason, e.g. `step_complete`, `log_create`, `event_join`.
    pub action_type: String,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsSummary {
    #[serde(default)]
    pub user_id: Option<String>,
    pub total_points: i64,
    #[serde(default)]
    pub recent_points: Vec<Point>,
}
