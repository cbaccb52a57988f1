//! Orchestration core for a Firebase management console.
//!
//! Mutating calls against the Firebase and Google Cloud management APIs return
//! long-running operations. This crate polls them ([`operation`]), sequences
//! dependent ones with resumable retry ([`orchestrator`]), and drives them from
//! validated multi-step wizards ([`wizard`], [`flow`]) whose state is published to
//! watch channels ([`state`]).
//!
//! Content screens (Firestore documents, Realtime Database nodes, Cloud Messaging
//! campaigns and Cloud Storage buckets) use plain one-shot clients.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use firebase_console_core::FirebaseConsole;
//! # use yup_oauth2::ServiceAccountKey;
//! # async fn run(key: ServiceAccountKey) {
//! let console = FirebaseConsole::new(key);
//! let mut flow = console.create_project_flow();
//! let mut updates = flow.subscribe();
//!
//! flow.edit(|draft| draft.with_display_name("My App"));
//! while flow.next().await != firebase_console_core::wizard::Transition::Finished {}
//!
//! println!("{:?}", updates.borrow_and_update().phase);
//! # }
//! ```

pub mod core;
pub mod flow;
pub mod operation;
pub mod orchestrator;
pub mod state;
pub mod wizard;

#[cfg(feature = "apps")]
pub mod apps;
#[cfg(feature = "databases")]
pub mod databases;
#[cfg(feature = "documents")]
pub mod documents;
#[cfg(feature = "messaging")]
pub mod messaging;
#[cfg(feature = "projects")]
pub mod projects;
#[cfg(feature = "realtime")]
pub mod realtime;
#[cfg(feature = "storage")]
pub mod storage;
#[cfg(feature = "testlab")]
pub mod testlab;

#[cfg(test)]
mod tests;

use crate::core::middleware::AuthMiddleware;
use crate::core::ConsoleError;
use crate::operation::{OperationPoller, OperationSource, DEFAULT_POLL_INTERVAL};
use std::time::Duration;
use yup_oauth2::ServiceAccountKey;

#[cfg(feature = "apps")]
use apps::{flow::CreateAppFlow, FirebaseApps};
#[cfg(feature = "databases")]
use databases::{flow::CreateDatabaseFlow, FirestoreDatabases};
#[cfg(feature = "documents")]
use documents::FirestoreDocuments;
#[cfg(feature = "messaging")]
use messaging::FirebaseMessaging;
#[cfg(feature = "projects")]
use projects::{flow::CreateProjectFlow, FirebaseProjects};
#[cfg(feature = "realtime")]
use realtime::RealtimeDatabase;
#[cfg(feature = "storage")]
use storage::CloudStorage;
#[cfg(feature = "testlab")]
use testlab::TestLab;

/// Entry point: hands out API clients and flows that share one service account.
#[derive(Clone)]
pub struct FirebaseConsole {
    middleware: AuthMiddleware,
    poll_interval: Duration,
}

impl FirebaseConsole {
    pub fn new(service_account_key: ServiceAccountKey) -> Self {
        Self {
            middleware: AuthMiddleware::new(service_account_key),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the delay between status reads for every poller and flow created afterwards.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// The project of the service account key.
    pub fn project_id(&self) -> Result<String, ConsoleError> {
        let project_id = self.middleware.project_id();
        if project_id.is_empty() {
            return Err(ConsoleError::ProjectIdMissing);
        }
        Ok(project_id)
    }

    /// A poller reading operations from `source` at the configured interval.
    pub fn poller<S: OperationSource>(&self, source: S) -> OperationPoller<S> {
        OperationPoller::new(source).with_interval(self.poll_interval)
    }

    #[cfg(feature = "projects")]
    pub fn projects(&self) -> FirebaseProjects {
        FirebaseProjects::new(self.middleware.clone())
    }

    #[cfg(feature = "apps")]
    pub fn apps(&self) -> FirebaseApps {
        FirebaseApps::new(self.middleware.clone())
    }

    #[cfg(feature = "databases")]
    pub fn databases(&self) -> FirestoreDatabases {
        FirestoreDatabases::new(self.middleware.clone())
    }

    #[cfg(feature = "testlab")]
    pub fn test_lab(&self) -> TestLab {
        TestLab::new(self.middleware.clone()).with_poll_interval(self.poll_interval)
    }

    #[cfg(feature = "documents")]
    pub fn documents(&self) -> FirestoreDocuments {
        FirestoreDocuments::new(self.middleware.clone())
    }

    /// Client for the Realtime Database instance at `database_url`.
    #[cfg(feature = "realtime")]
    pub fn realtime_database(&self, database_url: &str) -> Result<RealtimeDatabase, ConsoleError> {
        RealtimeDatabase::new(self.middleware.clone(), database_url)
    }

    #[cfg(feature = "messaging")]
    pub fn messaging(&self) -> FirebaseMessaging {
        FirebaseMessaging::new(self.middleware.clone())
    }

    #[cfg(feature = "storage")]
    pub fn storage(&self) -> CloudStorage {
        CloudStorage::new(self.middleware.clone())
    }

    #[cfg(feature = "projects")]
    pub fn create_project_flow(&self) -> CreateProjectFlow {
        CreateProjectFlow::new(self.projects()).with_poll_interval(self.poll_interval)
    }

    #[cfg(feature = "apps")]
    pub fn create_app_flow(&self, project_id: impl Into<String>) -> CreateAppFlow {
        CreateAppFlow::new(self.apps(), project_id).with_poll_interval(self.poll_interval)
    }

    #[cfg(feature = "databases")]
    pub fn create_database_flow(&self, project_id: impl Into<String>) -> CreateDatabaseFlow {
        CreateDatabaseFlow::new(self.databases(), project_id).with_poll_interval(self.poll_interval)
    }
}
