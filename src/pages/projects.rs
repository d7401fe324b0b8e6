use std::collections::HashSet;

use super::{ListPage, SubmitError};
use crate::api::projects;
use crate::error::ApiError;
use crate::forms::ProjectForm;
use crate::http::ApiClient;
use crate::models::{JoinReceipt, Project};

const LOAD_FAILED: &str = "Failed to load projects";
const CREATE_FAILED: &str = "Failed to create project";
const JOIN_FAILED: &str = "Failed to request membership";

pub struct ProjectsPage {
    client: ApiClient,
    pub list: ListPage<Project>,
    /// Projects with a membership request sent from this screen.
    pub requested: HashSet<String>,
}

impl ProjectsPage {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client, list: ListPage::default(), requested: HashSet::new() }
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        let fetch = projects::list(&self.client);
        self.list.load_with(fetch, LOAD_FAILED).await
    }

    /// Projects currently open for new members.
    #[must_use]
    pub fn recruiting(&self) -> Vec<&Project> {
        self.list.items.iter().filter(|p| p.is_recruiting).collect()
    }

    pub async fn create(&mut self, form: &ProjectForm) -> Result<Project, SubmitError> {
        let new_project = form.validate()?;
        self.list.creating = true;
        self.list.error = None;
        let result = projects::create(&self.client, &new_project).await;
        self.list.creating = false;
        match result {
            Ok(project) => {
                self.list.prepend(project.clone());
                Ok(project)
            }
            Err(e) => {
                self.list.record_error(&e, CREATE_FAILED);
                Err(e.into())
            }
        }
    }

    pub async fn join(&mut self, project_id: &str) -> Result<JoinReceipt, ApiError> {
        self.list.pending_id = Some(project_id.to_owned());
        self.list.error = None;
        let result = projects::join(&self.client, project_id).await;
        self.list.pending_id = None;
        match result {
            Ok(receipt) => {
                self.requested.insert(project_id.to_owned());
                Ok(receipt)
            }
            Err(e) => {
                self.list.record_error(&e, JOIN_FAILED);
                Err(e)
            }
        }
    }
}
