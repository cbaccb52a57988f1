//! Wizard screens that end in an orchestrated sequence of remote steps.
//!
//! [`Flow`] ties a [`Wizard`] to a [`StepOrchestrator`] and publishes every change
//! as a [`FlowState`] snapshot. The concrete screens (project, app and database
//! creation) only contribute their draft type, their error causes, and the step list.

use crate::orchestrator::{Step, StepEvent, StepOrchestrator};
use crate::state::{ErrorCause, ErrorState, StateHolder};
use crate::wizard::{Transition, Wizard, WizardStep};
use std::time::Duration;
use tokio::sync::watch;


#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// The user is filling in the wizard.
    Editing,
    /// Remote step `step` is in flight.
    Running { step: usize, label: &'static str },
    /// The sequence stopped at `step`; retrying resumes there.
    Failed { step: usize },
    Finished,
}

/// Snapshot of a flow as seen by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowState<D, E> {
    pub wizard_step: usize,
    pub draft: D,
    pub phase: Phase,
    /// Number of remote steps completed, counted from the start of the sequence.
    pub completed_steps: usize,
    pub error: Option<ErrorState<E>>,
}

/// What a retry request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The sequence was resumed and finished.
    Finished,
    /// The sequence was resumed and failed again.
    Failed,
    /// The current error offers no retry action; nothing was done.
    NotRetryable,
}

pub struct Flow<D, E> {
    wizard: Wizard<D, E>,
    orchestrator: StepOrchestrator,
    state: StateHolder<FlowState<D, E>>,
    phase: Phase,
    submitted: Option<D>,
}

impl<D, E> Flow<D, E>
where
    D: Clone + PartialEq + Send + Sync,
    E: ErrorCause,
{
    pub fn new(draft: D, steps: Vec<WizardStep<D, E>>) -> Self {
        let state = StateHolder::new(FlowState {
            wizard_step: 0,
            draft: draft.clone(),
            phase: Phase::Editing,
            completed_steps: 0,
            error: None,
        });
        Self {
            wizard: Wizard::new(draft, steps),
            orchestrator: StepOrchestrator::new(),
            state,
            phase: Phase::Editing,
            submitted: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.orchestrator = self.orchestrator.with_interval(interval);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowState<D, E>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FlowState<D, E> {
        self.state.snapshot()
    }

    pub fn draft(&self) -> &D {
        self.wizard.data()
    }

    pub fn wizard(&self) -> &Wizard<D, E> {
        &self.wizard
    }

    pub fn orchestrator(&self) -> &StepOrchestrator {
        &self.orchestrator
    }

    pub fn edit(&mut self, update: impl FnOnce(D) -> D) {
        self.wizard.edit(update);
        self.publish();
    }

    pub fn forward(&mut self) -> Transition {
        let transition = self.wizard.forward();
        self.publish();
        transition
    }

    pub fn back(&mut self) -> Transition {
        let transition = self.wizard.back();
        if matches!(self.phase, Phase::Failed { .. }) {
            self.phase = Phase::Editing;
        }
        self.publish();
        transition
    }

    pub fn dismiss_error(&mut self) {
        self.wizard.clear_error();
        self.publish();
    }

    /// Whether the shown error offers a retry of the failed remote step.
    pub fn can_retry(&self) -> bool {
        matches!(self.phase, Phase::Failed { .. })
            && self.wizard.error().is_some_and(|error| error.retryable)
    }

    /// Runs `steps` for the current draft, resuming after the last completed step
    /// when the draft is unchanged since the previous submission.
    pub async fn run(&mut self, steps: &[Step<'_, E>]) -> bool {
        let draft = self.wizard.data().clone();
        if self.submitted.as_ref() != Some(&draft) {
            self.orchestrator.reset();
            self.submitted = Some(draft);
        }

        self.wizard.clear_error();
        self.publish();

        let state = &self.state;
        let mut phase = self.phase.clone();
        let outcome = self
            .orchestrator
            .run(steps, |event| match event {
                StepEvent::Started { index, label } => {
                    phase = Phase::Running { step: index, label };
                    state.update(|s| {
                        s.phase = Phase::Running { step: index, label };
                        s.error = None;
                    });
                }
                StepEvent::Completed { index, .. } => {
                    state.update(|s| s.completed_steps = index + 1);
                }
                StepEvent::Failed { .. } => {}
            })
            .await;
        self.phase = phase;

        match outcome {
            Ok(()) => {
                self.phase = Phase::Finished;
                self.publish();
                true
            }
            Err(failure) => {
                self.phase = Phase::Failed { step: failure.index };
                self.wizard.set_error(failure.to_error_state());
                self.publish();
                false
            }
        }
    }

    /// Re-runs `steps` from the failed step if the shown error offers a retry.
    pub async fn retry(&mut self, steps: &[Step<'_, E>]) -> RetryOutcome {
        if !self.can_retry() {
            tracing::debug!(phase = ?self.phase, "retry requested without a retryable error");
            return RetryOutcome::NotRetryable;
        }

        if self.run(steps).await {
            RetryOutcome::Finished
        } else {
            RetryOutcome::Failed
        }
    }

    fn publish(&self) {
        let wizard_step = self.wizard.cursor();
        let draft = self.wizard.data().clone();
        let error = self.wizard.error().cloned();
        let phase = self.phase.clone();
        let completed_steps = self.orchestrator.resume_index();
        self.state.update(|s| {
            s.wizard_step = wizard_step;
            s.draft = draft;
            s.phase = phase;
            s.completed_steps = completed_steps;
            s.error = error;
        });
    }
}
