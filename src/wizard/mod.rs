//! Multi-step input wizards.
//!
//! A [`Wizard`] holds a step cursor and the user's draft. Moving forward runs the
//! current step's validation and stays put on failure; moving back is always allowed.
//! Reaching past the last step reports [`Transition::Finished`], which is the point
//! where a flow hands the draft to the step orchestrator.

pub mod validation;

use crate::state::{ErrorCause, ErrorState};


type Validator<D, E> = Box<dyn Fn(&D) -> Result<(), E> + Send + Sync>;

/// One page of a wizard and the predicate gating the move past it.
pub struct WizardStep<D, E> {
    pub title: &'static str,
    validate: Validator<D, E>,
}

impl<D, E> WizardStep<D, E> {
    pub fn new(
        title: &'static str,
        validate: impl Fn(&D) -> Result<(), E> + Send + Sync + 'static,
    ) -> Self {
        Self {
            title,
            validate: Box::new(validate),
        }
    }

    /// A step with nothing to validate, e.g. a review page.
    pub fn unchecked(title: &'static str) -> Self {
        Self::new(title, |_| Ok(()))
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The cursor now points at this step.
    Moved(usize),
    /// Validation failed; the cursor did not move and an error is set.
    Blocked,
    /// The last step validated.
    Finished,
}

pub struct Wizard<D, E> {
    steps: Vec<WizardStep<D, E>>,
    cursor: usize,
    data: D,
    error: Option<ErrorState<E>>,
}

impl<D: Clone, E: ErrorCause> Wizard<D, E> {
    pub fn new(data: D, steps: Vec<WizardStep<D, E>>) -> Self {
        Self {
            steps,
            cursor: 0,
            data,
            error: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_last_step(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }

    pub fn title(&self) -> Option<&'static str> {
        self.steps.get(self.cursor).map(|step| step.title)
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn error(&self) -> Option<&ErrorState<E>> {
        self.error.as_ref()
    }

    /// Replaces the draft with an updated copy. Any shown error is cleared.
    pub fn edit(&mut self, update: impl FnOnce(D) -> D) {
        self.data = update(self.data.clone());
        self.error = None;
    }

    pub fn forward(&mut self) -> Transition {
        if let Some(step) = self.steps.get(self.cursor) {
            if let Err(cause) = (step.validate)(&self.data) {
                tracing::debug!(step = step.title, ?cause, "wizard step rejected");
                self.error = Some(ErrorState::new(cause));
                return Transition::Blocked;
            }
        }

        self.error = None;
        if self.is_last_step() {
            Transition::Finished
        } else {
            self.cursor += 1;
            Transition::Moved(self.cursor)
        }
    }

    pub fn back(&mut self) -> Transition {
        self.error = None;
        self.cursor = self.cursor.saturating_sub(1);
        Transition::Moved(self.cursor)
    }

    pub fn set_error(&mut self, error: ErrorState<E>) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
