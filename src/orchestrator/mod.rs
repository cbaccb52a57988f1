//! Sequencing of dependent remote steps.
//!
//! [`StepOrchestrator`] runs an ordered list of [`Step`]s from a resumable index.
//! A remote step starts a mutation and waits for the returned operation with an
//! [`OperationPoller`]. The first failure stops the run and leaves the index on the
//! failed step, so running the same list again resumes there instead of at step 0.
//! Completed steps are never undone.

use crate::core::ConsoleError;
use crate::operation::{Operation, OperationPoller, OperationSource, Status, DEFAULT_POLL_INTERVAL};
use crate::state::{ErrorCause, ErrorState};
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;


type LocalCheck<'a, E> = Box<dyn Fn() -> Result<(), E> + Send + Sync + 'a>;
type RemoteCall<'a> =
    Box<dyn Fn(&StepResults) -> BoxFuture<'a, Result<(), ConsoleError>> + Send + Sync + 'a>;
type RemoteMutation<'a> =
    Box<dyn Fn(&StepResults) -> BoxFuture<'a, Result<Operation, ConsoleError>> + Send + Sync + 'a>;

enum StepAction<'a, E> {
    Local(LocalCheck<'a, E>),
    Call(RemoteCall<'a>),
    Operation {
        start: RemoteMutation<'a>,
        source: Arc<dyn OperationSource>,
    },
}

/// One unit of work in an orchestrated sequence.
pub struct Step<'a, E> {
    label: &'static str,
    cause: Option<E>,
    action: StepAction<'a, E>,
}

impl<'a, E: ErrorCause> Step<'a, E> {
    /// A step without any remote component, checked inline.
    pub fn local(label: &'static str, check: impl Fn() -> Result<(), E> + Send + Sync + 'a) -> Self {
        Self {
            label,
            cause: None,
            action: StepAction::Local(Box::new(check)),
        }
    }

    /// A one-shot remote call that returns no operation.
    pub fn call(
        label: &'static str,
        cause: E,
        call: impl Fn(&StepResults) -> BoxFuture<'a, Result<(), ConsoleError>> + Send + Sync + 'a,
    ) -> Self {
        Self {
            label,
            cause: Some(cause),
            action: StepAction::Call(Box::new(call)),
        }
    }

    /// A remote mutation answered with an operation that is polled on `source`.
    pub fn operation(
        label: &'static str,
        cause: E,
        source: Arc<dyn OperationSource>,
        start: impl Fn(&StepResults) -> BoxFuture<'a, Result<Operation, ConsoleError>> + Send + Sync + 'a,
    ) -> Self {
        Self {
            label,
            cause: Some(cause),
            action: StepAction::Operation {
                start: Box::new(start),
                source,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Terminal operations of the steps completed so far, by step index.
#[derive(Debug, Clone, Default)]
pub struct StepResults {
    operations: BTreeMap<usize, Operation>,
}

impl StepResults {
    pub fn get(&self, index: usize) -> Option<&Operation> {
        self.operations.get(&index)
    }

    /// Reads a string field of the `response` payload of step `index`.
    pub fn response_field(&self, index: usize, field: &str) -> Option<String> {
        self.get(index)?
            .response
            .as_ref()?
            .get(field)?
            .as_str()
            .map(str::to_string)
    }
}

/// Progress notifications emitted while a sequence runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Started { index: usize, label: &'static str },
    Completed { index: usize, label: &'static str },
    Failed { index: usize, label: &'static str },
}

/// The step a run stopped at, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailed<E> {
    pub index: usize,
    pub label: &'static str,
    pub cause: E,
    /// The remote error, absent for local validation failures.
    pub status: Option<Status>,
}

impl<E: ErrorCause> StepFailed<E> {
    pub fn to_error_state(&self) -> ErrorState<E> {
        match &self.status {
            Some(status) if !status.is_no_connection() && !status.message.is_empty() => {
                let message = format!("{}: {}", self.cause.default_message(), status.message);
                ErrorState::with_message(self.cause.clone(), message)
            }
            _ => ErrorState::new(self.cause.clone()),
        }
    }
}

/// Runs step lists sequentially and remembers where to resume.
pub struct StepOrchestrator {
    interval: Duration,
    cursor: usize,
    results: StepResults,
}

impl Default for StepOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl StepOrchestrator {
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            cursor: 0,
            results: StepResults::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Index of the next step to run.
    pub fn resume_index(&self) -> usize {
        self.cursor
    }

    pub fn results(&self) -> &StepResults {
        &self.results
    }

    /// Forgets progress so the next run starts at step 0.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.results = StepResults::default();
    }

    /// Runs `steps` from the resume index, reporting progress to `observer`.
    pub async fn run<E: ErrorCause>(
        &mut self,
        steps: &[Step<'_, E>],
        mut observer: impl FnMut(StepEvent),
    ) -> Result<(), StepFailed<E>> {
        if self.cursor > 0 {
            tracing::info!(resume_at = self.cursor, total = steps.len(), "resuming step sequence");
        }

        for (index, step) in steps.iter().enumerate().skip(self.cursor) {
            let label = step.label;
            observer(StepEvent::Started { index, label });
            tracing::info!(index, step = label, "step started");

            match self.execute(index, step).await {
                Ok(operation) => {
                    if let Some(operation) = operation {
                        self.results.operations.insert(index, operation);
                    }
                    self.cursor = index + 1;
                    tracing::info!(index, step = label, "step completed");
                    observer(StepEvent::Completed { index, label });
                }
                Err(failure) => {
                    tracing::warn!(index, step = label, cause = ?failure.cause, "step failed");
                    observer(StepEvent::Failed { index, label });
                    return Err(failure);
                }
            }
        }

        Ok(())
    }

    async fn execute<E: ErrorCause>(
        &self,
        index: usize,
        step: &Step<'_, E>,
    ) -> Result<Option<Operation>, StepFailed<E>> {
        let fail = |status: Status| {
            let cause = if status.is_no_connection() {
                E::no_connection()
            } else {
                step.cause.clone().unwrap_or_else(E::no_connection)
            };
            StepFailed {
                index,
                label: step.label,
                cause,
                status: Some(status),
            }
        };

        match &step.action {
            StepAction::Local(check) => check().map(|_| None).map_err(|cause| StepFailed {
                index,
                label: step.label,
                cause,
                status: None,
            }),
            StepAction::Call(call) => call(&self.results)
                .await
                .map(|_| None)
                .map_err(|err| fail(status_from_error(&err))),
            StepAction::Operation { start, source } => {
                let started = start(&self.results)
                    .await
                    .map_err(|err| fail(status_from_error(&err)))?;

                let finished = if started.is_terminal() {
                    started
                } else {
                    OperationPoller::new(source.clone())
                        .with_interval(self.interval)
                        .wait(&started.name)
                        .await
                };

                match finished.error.clone() {
                    Some(status) => Err(fail(status)),
                    None => Ok(Some(finished)),
                }
            }
        }
    }
}

/// Maps an immediate request failure onto the status a failed operation would carry.
fn status_from_error(err: &ConsoleError) -> Status {
    match err {
        err if err.is_connectivity() => Status::no_connection(),
        ConsoleError::ApiError(message) => Status::new(Status::INTERNAL, message.clone()),
        err => Status::internal(err),
    }
}
