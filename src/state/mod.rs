//! Screen state published to the UI.
//!
//! A flow owns exactly one [`StateHolder`] and is its only writer. Any number of
//! observers subscribe and read the latest snapshot.

use std::fmt::Debug;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;


/// A closed set of failure causes for one screen.
pub trait ErrorCause: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The cause reported when the remote API could not be reached.
    fn no_connection() -> Self;

    /// Whether the notification for this cause offers a retry action.
    fn is_retryable(&self) -> bool;

    fn default_message(&self) -> String;
}

/// A failure shown to the user as a dismissible notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorState<E> {
    pub cause: E,
    pub message: String,
    pub retryable: bool,
}

impl<E: ErrorCause> ErrorState<E> {
    pub fn new(cause: E) -> Self {
        let message = cause.default_message();
        Self::with_message(cause, message)
    }

    pub fn with_message(cause: E, message: impl Into<String>) -> Self {
        let retryable = cause.is_retryable();
        Self {
            cause,
            message: message.into(),
            retryable,
        }
    }
}

/// Single-producer, multi-consumer container of the latest screen snapshot.
pub struct StateHolder<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone + Send + Sync> StateHolder<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Mutates the snapshot in place and notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    pub fn replace(&self, value: T) {
        self.tx.send_replace(value);
    }
}

/// Owns the tasks spawned on behalf of one screen and aborts them when dropped.
///
/// Polling has no cancellation token of its own; dropping the scope is how a
/// destroyed screen stops its poll loops.
#[derive(Default)]
pub struct ScreenScope {
    tasks: Vec<JoinHandle<()>>,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(tokio::spawn(future));
    }

    /// Number of launched tasks that have not finished yet.
    pub fn active(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    pub fn cancel(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(tasks = self.tasks.len(), "screen scope dropped, cancelling tasks");
        }
        self.cancel();
    }
}
