use serde::{Deserialize, Serialize};

use super::{Event, Goal, Log};

/// Aggregate returned by `GET /dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub personal: PersonalArea,
    pub community: CommunityArea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalArea {
    #[serde(default)]
    pub active_goals: Vec<Goal>,
    #[serde(default)]
    pub recent_logs: Vec<Log>,
    #[serde(default)]
    pub total_points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityArea {
    #[serde(default)]
    pub upcoming_events: Vec<Event>,
    #[serde(default)]
    pub recent_public_logs: Vec<Log>,
}
