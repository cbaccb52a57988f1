//! The "create database" wizard.

use super::models::{
    Database, DatabasePatch, DatabaseType, DeleteProtectionState, PointInTimeRecoveryEnablement,
};
use super::FirestoreDatabases;
use crate::flow::{Flow, FlowState, RetryOutcome};
use crate::operation::OperationSource;
use crate::orchestrator::Step;
use crate::state::ErrorCause;
use crate::wizard::validation::{is_present, is_valid_database_id, DEFAULT_DATABASE_ID};
use crate::wizard::{Transition, WizardStep};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const STEP_DATABASE: usize = 0;
pub const STEP_OPTIONS: usize = 1;
pub const STEP_REVIEW: usize = 2;

const CREATE_STEP: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseDraft {
    pub database_id: String,
    pub location_id: String,
    pub database_type: DatabaseType,
    pub delete_protection: bool,
    pub point_in_time_recovery: bool,
}

impl Default for DatabaseDraft {
    fn default() -> Self {
        Self {
            database_id: DEFAULT_DATABASE_ID.to_string(),
            location_id: String::new(),
            database_type: DatabaseType::FirestoreNative,
            delete_protection: false,
            point_in_time_recovery: false,
        }
    }
}

impl DatabaseDraft {
    pub fn with_database_id(self, database_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            ..self
        }
    }

    pub fn with_location(self, location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            ..self
        }
    }

    pub fn with_type(self, database_type: DatabaseType) -> Self {
        Self {
            database_type,
            ..self
        }
    }

    pub fn with_delete_protection(self, enabled: bool) -> Self {
        Self {
            delete_protection: enabled,
            ..self
        }
    }

    pub fn with_point_in_time_recovery(self, enabled: bool) -> Self {
        Self {
            point_in_time_recovery: enabled,
            ..self
        }
    }

    fn database_id(&self) -> &str {
        self.database_id.trim()
    }

    fn to_database(&self) -> Database {
        Database {
            location_id: self.location_id.trim().to_string(),
            database_type: self.database_type,
            delete_protection_state: if self.delete_protection {
                DeleteProtectionState::Enabled
            } else {
                DeleteProtectionState::Disabled
            },
            ..Database::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateDatabaseError {
    EmptyDatabaseId,
    InvalidDatabaseId,
    EmptyLocation,
    NoConnection,
    CreateDatabaseFailed,
    EnableRecoveryFailed,
}

impl ErrorCause for CreateDatabaseError {
    fn no_connection() -> Self {
        CreateDatabaseError::NoConnection
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            CreateDatabaseError::NoConnection
                | CreateDatabaseError::CreateDatabaseFailed
                | CreateDatabaseError::EnableRecoveryFailed
        )
    }

    fn default_message(&self) -> String {
        match self {
            CreateDatabaseError::EmptyDatabaseId => "Enter a database ID",
            CreateDatabaseError::InvalidDatabaseId => {
                "Database IDs are 4 to 63 lowercase letters, digits or hyphens and start with a letter"
            }
            CreateDatabaseError::EmptyLocation => "Choose a location",
            CreateDatabaseError::NoConnection => "No connection",
            CreateDatabaseError::CreateDatabaseFailed => "Could not create the database",
            CreateDatabaseError::EnableRecoveryFailed => "Could not enable point-in-time recovery",
        }
        .to_string()
    }
}

fn validate_database(draft: &DatabaseDraft) -> Result<(), CreateDatabaseError> {
    if !is_present(&draft.database_id) {
        return Err(CreateDatabaseError::EmptyDatabaseId);
    }
    if !is_valid_database_id(draft.database_id()) {
        return Err(CreateDatabaseError::InvalidDatabaseId);
    }
    if !is_present(&draft.location_id) {
        return Err(CreateDatabaseError::EmptyLocation);
    }
    Ok(())
}

pub type CreateDatabaseState = FlowState<DatabaseDraft, CreateDatabaseError>;

struct DatabaseRemote {
    databases: FirestoreDatabases,
    operations: Arc<dyn OperationSource>,
    project_id: String,
}

impl DatabaseRemote {
    fn steps<'a>(&'a self, draft: &'a DatabaseDraft) -> Vec<Step<'a, CreateDatabaseError>> {
        let databases = &self.databases;
        let project_id = self.project_id.as_str();

        let mut steps = vec![
            Step::local("Validate", move || validate_database(draft)),
            Step::operation(
                "Create database",
                CreateDatabaseError::CreateDatabaseFailed,
                self.operations.clone(),
                move |_| {
                    let database = draft.to_database();
                    async move {
                        databases
                            .create_database(project_id, draft.database_id(), &database)
                            .await
                    }
                    .boxed()
                },
            ),
        ];

        if draft.point_in_time_recovery {
            steps.push(Step::operation(
                "Enable point-in-time recovery",
                CreateDatabaseError::EnableRecoveryFailed,
                self.operations.clone(),
                move |_| {
                    let patch = DatabasePatch {
                        point_in_time_recovery_enablement: Some(
                            PointInTimeRecoveryEnablement::Enabled,
                        ),
                        ..DatabasePatch::default()
                    };
                    async move {
                        databases
                            .patch_database(project_id, draft.database_id(), &patch)
                            .await
                    }
                    .boxed()
                },
            ));
        }

        steps
    }
}

/// Wizard enabling a Cloud Firestore database: id and location, options, review.
pub struct CreateDatabaseFlow {
    remote: DatabaseRemote,
    flow: Flow<DatabaseDraft, CreateDatabaseError>,
}

impl CreateDatabaseFlow {
    pub fn new(databases: FirestoreDatabases, project_id: impl Into<String>) -> Self {
        let remote = DatabaseRemote {
            operations: Arc::new(databases.operations()),
            databases,
            project_id: project_id.into(),
        };
        let flow = Flow::new(
            DatabaseDraft::default(),
            vec![
                WizardStep::new("Database", validate_database),
                WizardStep::unchecked("Options"),
                WizardStep::unchecked("Review"),
            ],
        );
        Self { remote, flow }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.flow = self.flow.with_poll_interval(interval);
        self
    }

    pub fn project_id(&self) -> &str {
        &self.remote.project_id
    }

    pub fn subscribe(&self) -> watch::Receiver<CreateDatabaseState> {
        self.flow.subscribe()
    }

    pub fn snapshot(&self) -> CreateDatabaseState {
        self.flow.snapshot()
    }

    pub fn edit(&mut self, update: impl FnOnce(DatabaseDraft) -> DatabaseDraft) {
        self.flow.edit(update);
    }

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

    pub async fn retry(&mut self) -> RetryOutcome {
        let draft = self.flow.draft().clone();
        let steps = self.remote.steps(&draft);
        self.flow.retry(&steps).await
    }

    /// The database returned by the finished create operation.
    pub fn created_database(&self) -> Option<Database> {
        self.flow
            .orchestrator()
            .results()
            .get(CREATE_STEP)
            .and_then(|operation| operation.response_as().ok().flatten())
    }
}
