//! Goals screen: goal list, status/progress updates and steps.

use std::collections::HashMap;

use super::{ListPage, SubmitError};
use crate::api::{goals, steps};
use crate::error::ApiError;
use crate::forms::{GoalForm, StepForm};
use crate::http::ApiClient;
use crate::models::{Goal, GoalPatch, GoalStatus, Step};

const LOAD_FAILED: &str = "Failed to load goals";
const CREATE_FAILED: &str = "Failed to create goal";
const UPDATE_FAILED: &str = "Failed to update goal";
const DELETE_FAILED: &str = "Failed to delete goal";
const STEP_FAILED: &str = "Failed to update step";

/// Counts shown above the goal list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

pub struct GoalsPage {
    client: ApiClient,
    pub list: ListPage<Goal>,
    /// Steps created or touched in this screen, keyed by goal id.
    pub steps: HashMap<String, Vec<Step>>,
}

impl GoalsPage {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client, list: ListPage::default(), steps: HashMap::new() }
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        let fetch = goals::list(&self.client);
        self.list.load_with(fetch, LOAD_FAILED).await
    }

    #[must_use]
    pub fn summary(&self) -> GoalSummary {
        let count = |status| self.list.items.iter().filter(|g| g.status == status).count();
        GoalSummary {
            total: self.list.items.len(),
            active: count(GoalStatus::Active),
            completed: count(GoalStatus::Completed),
        }
    }

    pub async fn create(&mut self, form: &GoalForm) -> Result<Goal, SubmitError> {
        let new_goal = form.validate()?;
        self.list.creating = true;
        self.list.error = None;
        let result = goals::create(&self.client, &new_goal).await;
        self.list.creating = false;
        match result {
            Ok(goal) => {
                self.list.prepend(goal.clone());
                Ok(goal)
            }
            Err(e) => {
                self.list.record_error(&e, CREATE_FAILED);
                Err(e.into())
            }
        }
    }

    pub async fn set_status(&mut self, goal_id: &str, status: GoalStatus) -> Result<Goal, ApiError> {
        self.update(goal_id, &GoalPatch { status: Some(status), ..GoalPatch::default() })
            .await
    }

    /// Progress is clamped to 0..=100.
    pub async fn set_progress(&mut self, goal_id: &str, progress: i32) -> Result<Goal, ApiError> {
        let patch = GoalPatch { progress: Some(progress.clamp(0, 100)), ..GoalPatch::default() };
        self.update(goal_id, &patch).await
    }

    pub async fn update(&mut self, goal_id: &str, patch: &GoalPatch) -> Result<Goal, ApiError> {
        self.list.pending_id = Some(goal_id.to_owned());
        self.list.error = None;
        let result = goals::update(&self.client, goal_id, patch).await;
        self.list.pending_id = None;
        match result {
            Ok(goal) => {
                self.list.replace(goal.clone());
                Ok(goal)
            }
            Err(e) => {
                self.list.record_error(&e, UPDATE_FAILED);
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, goal_id: &str) -> Result<(), ApiError> {
        self.list.pending_id = Some(goal_id.to_owned());
        self.list.error = None;
        let result = goals::delete(&self.client, goal_id).await;
        self.list.pending_id = None;
        match result {
            Ok(()) => {
                self.list.remove(goal_id);
                self.steps.remove(goal_id);
                Ok(())
            }
            Err(e) => {
                self.list.record_error(&e, DELETE_FAILED);
                Err(e)
            }
        }
    }

    pub async fn add_step(&mut self, goal_id: &str, form: &StepForm) -> Result<Step, SubmitError> {
        let new_step = form.validate()?;
        self.list.error = None;
        match steps::create(&self.client, goal_id, &new_step).await {
            Ok(step) => {
                let entry = self.steps.entry(goal_id.to_owned()).or_default();
                entry.push(step.clone());
                entry.sort_by_key(|s| s.order);
                Ok(step)
            }
            Err(e) => {
                self.list.record_error(&e, STEP_FAILED);
                Err(e.into())
            }
        }
    }

    /// Complete a step and refresh its goal, whose progress the backend recomputes.
    pub async fn complete_step(&mut self, goal_id: &str, step_id: &str) -> Result<Step, ApiError> {
        self.list.error = None;
        let step = match steps::complete(&self.client, step_id).await {
            Ok(step) => step,
            Err(e) => {
                self.list.record_error(&e, STEP_FAILED);
                return Err(e);
            }
        };
        if let Some(slot) = self
            .steps
            .get_mut(goal_id)
            .and_then(|list| list.iter_mut().find(|s| s.id == step.id))
        {
            *slot = step.clone();
        }
        match goals::get(&self.client, goal_id).await {
            Ok(goal) => self.list.replace(goal),
            Err(e) => self.list.record_error(&e, LOAD_FAILED),
        }
        Ok(step)
    }
}
