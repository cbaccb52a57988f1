//! Long-running operation polling.
//!
//! Mutating calls against the management APIs answer with an [`Operation`] handle.
//! [`OperationPoller`] reads the handle back from the API's status endpoint at a
//! fixed interval until it is done or carries an error. There is no backoff and no
//! automatic retry: a failed status read ends the poll with a synthesized error and
//! it is up to the caller to start over.
//!
//! The loop itself lives in [`poll_until`] so that resources which are not
//! `google.longrunning` operations (Test Lab matrices) can share it.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use firebase_console_core::FirebaseConsole;
//! # async fn run(console: FirebaseConsole) {
//! let projects = console.projects();
//! let poller = console.poller(projects.firebase_operations());
//!
//! let operation = projects.add_firebase("my-project").await.unwrap();
//! let added = poller.await_completion(&operation.name).await;
//! # }
//! ```

pub mod models;

pub use self::models::{Operation, Status};

use crate::core::middleware::AuthMiddleware;
use crate::core::{build_status_client, send_json, ConsoleError};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;


/// Fixed delay between two status reads.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// A remote resource whose status is read repeatedly until it settles.
pub trait Pollable {
    fn is_terminal(&self) -> bool;
}

impl Pollable for Operation {
    fn is_terminal(&self) -> bool {
        Operation::is_terminal(self)
    }
}

/// Reads `check` until it yields a terminal value, sleeping `interval` between reads.
///
/// The first read happens immediately. No sleep follows the terminal read: the loop
/// returns as soon as it observes a terminal value, so the caller is not held for one
/// more interval. An error from `check` ends the loop and is returned as is, without
/// another read.
pub async fn poll_until<T, F, Fut>(interval: Duration, mut check: F) -> Result<T, ConsoleError>
where
    T: Pollable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ConsoleError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let current = check().await?;
        if current.is_terminal() {
            tracing::debug!(attempt, "poll reached terminal state");
            return Ok(current);
        }
        tracing::debug!(attempt, ?interval, "not done yet");
        tokio::time::sleep(interval).await;
    }
}

/// The status endpoint of an API's `operations` resources.
#[async_trait]
pub trait OperationSource: Send + Sync {
    async fn get_operation(&self, name: &str) -> Result<Operation, ConsoleError>;
}

#[async_trait]
impl<T: OperationSource + ?Sized> OperationSource for Arc<T> {
    async fn get_operation(&self, name: &str) -> Result<Operation, ConsoleError> {
        (**self).get_operation(name).await
    }
}

/// Reads operations from `GET {base_url}/{name}`, without retrying failed reads.
#[derive(Clone)]
pub struct OperationsClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OperationsClient {
    pub fn new(middleware: AuthMiddleware, base_url: &str) -> Self {
        Self {
            client: build_status_client(middleware),
            base_url: base_url.to_string(),
        }
    }

    pub(crate) fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl OperationSource for OperationsClient {
    async fn get_operation(&self, name: &str) -> Result<Operation, ConsoleError> {
        let url = format!("{}/{}", self.base_url, name.trim_start_matches('/'));
        send_json(self.client.get(&url), "Get operation failed").await
    }
}

/// Waits for operations to finish by polling an [`OperationSource`].
#[derive(Clone)]
pub struct OperationPoller<S> {
    source: S,
    interval: Duration,
}

impl<S: OperationSource> OperationPoller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls `name` until it is terminal and returns the last observed operation.
    ///
    /// A failed status read is final: the returned operation carries a
    /// [`Status::no_connection`] or [`Status::internal`] error instead.
    pub async fn wait(&self, name: &str) -> Operation {
        let source = &self.source;
        match poll_until(self.interval, move || source.get_operation(name)).await {
            Ok(operation) => {
                if let Some(error) = &operation.error {
                    tracing::warn!(operation = name, code = error.code, message = %error.message, "operation failed");
                }
                operation
            }
            Err(err) => {
                tracing::warn!(operation = name, error = %err, "status read failed, giving up");
                let status = if err.is_connectivity() {
                    Status::no_connection()
                } else {
                    Status::internal(&err)
                };
                Operation::failed_locally(name, status)
            }
        }
    }

    /// Polls `name` until it is terminal; true only if it finished without an error.
    pub async fn await_completion(&self, name: &str) -> bool {
        self.wait(name).await.succeeded()
    }
}
