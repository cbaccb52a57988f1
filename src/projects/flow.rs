//! The "create project" wizard.

use super::FirebaseProjects;
use crate::flow::{Flow, FlowState, RetryOutcome};
use crate::operation::OperationSource;
use crate::orchestrator::Step;
use crate::state::ErrorCause;
use crate::wizard::validation::{is_present, is_valid_project_id, suggest_project_id};
use crate::wizard::{Transition, WizardStep};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const STEP_DETAILS: usize = 0;
pub const STEP_ANALYTICS: usize = 1;
pub const STEP_REVIEW: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub display_name: String,
    pub project_id: String,
    pub analytics_enabled: bool,
    pub analytics_account_id: String,
}

impl ProjectDraft {
    /// Sets the display name, pre-filling the project id until the user edits it.
    pub fn with_display_name(self, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let project_id = if self.project_id.is_empty()
            || self.project_id == suggest_project_id(&self.display_name)
        {
            suggest_project_id(&display_name)
        } else {
            self.project_id
        };
        Self {
            display_name,
            project_id,
            ..self
        }
    }

    pub fn with_project_id(self, project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..self
        }
    }

    pub fn with_analytics(self, enabled: bool) -> Self {
        Self {
            analytics_enabled: enabled,
            ..self
        }
    }

    pub fn with_analytics_account(self, account_id: impl Into<String>) -> Self {
        Self {
            analytics_account_id: account_id.into(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateProjectError {
    EmptyDisplayName,
    EmptyProjectId,
    InvalidProjectId,
    MissingAnalyticsAccount,
    NoConnection,
    CreateProjectFailed,
    AddFirebaseFailed,
    AddAnalyticsFailed,
}

impl ErrorCause for CreateProjectError {
    fn no_connection() -> Self {
        CreateProjectError::NoConnection
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            CreateProjectError::NoConnection
                | CreateProjectError::CreateProjectFailed
                | CreateProjectError::AddFirebaseFailed
                | CreateProjectError::AddAnalyticsFailed
        )
    }

    fn default_message(&self) -> String {
        match self {
            CreateProjectError::EmptyDisplayName => "Enter a project name",
            CreateProjectError::EmptyProjectId => "Enter a project ID",
            CreateProjectError::InvalidProjectId => {
                "Project IDs are 6 to 30 lowercase letters, digits or hyphens and start with a letter"
            }
            CreateProjectError::MissingAnalyticsAccount => "Choose a Google Analytics account",
            CreateProjectError::NoConnection => "No connection",
            CreateProjectError::CreateProjectFailed => "Could not create the project",
            CreateProjectError::AddFirebaseFailed => "Could not add Firebase to the project",
            CreateProjectError::AddAnalyticsFailed => "Could not enable Google Analytics",
        }
        .to_string()
    }
}

fn validate_details(draft: &ProjectDraft) -> Result<(), CreateProjectError> {
    if !is_present(&draft.display_name) {
        return Err(CreateProjectError::EmptyDisplayName);
    }
    if !is_present(&draft.project_id) {
        return Err(CreateProjectError::EmptyProjectId);
    }
    if !is_valid_project_id(&draft.project_id) {
        return Err(CreateProjectError::InvalidProjectId);
    }
    Ok(())
}

fn validate_analytics(draft: &ProjectDraft) -> Result<(), CreateProjectError> {
    if draft.analytics_enabled && !is_present(&draft.analytics_account_id) {
        return Err(CreateProjectError::MissingAnalyticsAccount);
    }
    Ok(())
}

pub type CreateProjectState = FlowState<ProjectDraft, CreateProjectError>;

/// The remote side of project creation.
struct ProjectRemote {
    projects: FirebaseProjects,
    crm_operations: Arc<dyn OperationSource>,
    firebase_operations: Arc<dyn OperationSource>,
}

impl ProjectRemote {
    fn steps<'a>(&'a self, draft: &'a ProjectDraft) -> Vec<Step<'a, CreateProjectError>> {
        let projects = &self.projects;
        let mut steps = vec![
            Step::local("Validate", move || {
                validate_details(draft).and_then(|_| validate_analytics(draft))
            }),
            Step::operation(
                "Create project",
                CreateProjectError::CreateProjectFailed,
                self.crm_operations.clone(),
                move |_| {
                    projects
                        .create_gcp_project(&draft.project_id, &draft.display_name)
                        .boxed()
                },
            ),
            Step::operation(
                "Add Firebase",
                CreateProjectError::AddFirebaseFailed,
                self.firebase_operations.clone(),
                move |_| projects.add_firebase(&draft.project_id).boxed(),
            ),
        ];

        if draft.analytics_enabled {
            steps.push(Step::operation(
                "Add Google Analytics",
                CreateProjectError::AddAnalyticsFailed,
                self.firebase_operations.clone(),
                move |_| {
                    projects
                        .add_google_analytics(&draft.project_id, &draft.analytics_account_id)
                        .boxed()
                },
            ));
        }

        steps
    }
}

/// Wizard for a new Firebase project: details, Analytics, review.
///
/// Finishing the review page runs: validate, create the Cloud project, add
/// Firebase, then add Google Analytics when it is enabled.
pub struct CreateProjectFlow {
    remote: ProjectRemote,
    flow: Flow<ProjectDraft, CreateProjectError>,
}

impl CreateProjectFlow {
    pub fn new(projects: FirebaseProjects) -> Self {
        let remote = ProjectRemote {
            crm_operations: Arc::new(projects.crm_operations()),
            firebase_operations: Arc::new(projects.firebase_operations()),
            projects,
        };
        let flow = Flow::new(
            ProjectDraft::default(),
            vec![
                WizardStep::new("Project details", validate_details),
                WizardStep::new("Google Analytics", validate_analytics),
                WizardStep::unchecked("Review"),
            ],
        );
        Self { remote, flow }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.flow = self.flow.with_poll_interval(interval);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<CreateProjectState> {
        self.flow.subscribe()
    }

    pub fn snapshot(&self) -> CreateProjectState {
        self.flow.snapshot()
    }

    pub fn edit(&mut self, update: impl FnOnce(ProjectDraft) -> ProjectDraft) {
        self.flow.edit(update);
    }

    /// Moves to the next page; leaving the review page creates the project.
    pub async fn next(&mut self) -> Transition {
        let transition = self.flow.forward();
        if transition == Transition::Finished {
            let draft = self.flow.draft().clone();
            let steps = self.remote.steps(&draft);
            self.flow.run(&steps).await;
        }
        transition
    }

    pub fn back(&mut self) -> Transition {
        self.flow.back()
    }

    pub fn dismiss_error(&mut self) {
        self.flow.dismiss_error();
    }

    /// Resumes creation at the step that failed.
    pub async fn retry(&mut self) -> RetryOutcome {
        let draft = self.flow.draft().clone();
        let steps = self.remote.steps(&draft);
        self.flow.retry(&steps).await
    }
}
