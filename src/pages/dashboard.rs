//! Dashboard screen: the four personal lists at a glance.
//!
//! The four fetches run concurrently with no completion order; the page stays
//! loading until all of them settle.

use serde::Serialize;

use super::record_error;
use crate::api::{events, goals, logs, projects};
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{Event, EventStatus, Goal, GoalStatus, Log, Project};

const LOAD_FAILED: &str = "Failed to load dashboard";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub active_goals: usize,
    pub logs: usize,
    pub upcoming_events: usize,
    pub projects: usize,
}

pub struct DashboardPage {
    client: ApiClient,
    pub goals: Vec<Goal>,
    pub logs: Vec<Log>,
    pub events: Vec<Event>,
    pub projects: Vec<Project>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardPage {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            goals: Vec::new(),
            logs: Vec::new(),
            events: Vec::new(),
            projects: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Lists that did load are kept even when another one fails.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;
        let (goals, logs, events, projects) = tokio::join!(
            goals::list(&self.client),
            logs::list(&self.client),
            events::list(&self.client),
            projects::list(&self.client),
        );
        self.loading = false;

        let mut first_error = None;
        keep(goals, &mut self.goals, &mut first_error);
        keep(logs, &mut self.logs, &mut first_error);
        keep(events, &mut self.events, &mut first_error);
        keep(projects, &mut self.projects, &mut first_error);

        match first_error {
            None => Ok(()),
            Some(e) => {
                record_error(&mut self.error, &e, LOAD_FAILED);
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            active_goals: self.goals.iter().filter(|g| g.status == GoalStatus::Active).count(),
            logs: self.logs.len(),
            upcoming_events: self
                .events
                .iter()
                .filter(|e| matches!(e.status, EventStatus::Upcoming | EventStatus::Published))
                .count(),
            projects: self.projects.len(),
        }
    }
}

fn keep<T>(result: Result<Vec<T>, ApiError>, slot: &mut Vec<T>, first_error: &mut Option<ApiError>) {
    match result {
        Ok(items) => *slot = items,
        Err(e) => {
            if first_error.is_none() {
                *first_error = Some(e);
            }
        }
    }
}
