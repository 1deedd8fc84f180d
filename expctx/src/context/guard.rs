//! Lifecycle tracking and the scoped experiment guard.

use std::fmt;
use std::ops::Deref;

use crate::core::{ContextState, Experiment};

/// Completion entry written when a context closes.
pub const COMPLETION_MESSAGE: &str = "Cleanly exited.";

/// Walks a context through [`ContextState`] during entry.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    name: String,
    state: ContextState,
}

impl Lifecycle {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: ContextState::Uninitialized,
        }
    }

    pub(crate) const fn state(&self) -> ContextState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: ContextState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {next}",
            self.state
        );
        tracing::debug!(experiment = %self.name, from = %self.state, to = %next, "Context state transition");
        self.state = next;
    }
}

/// An entered experiment context.
///
/// Dereferences to the [`Experiment`]. Dropping the guard closes the
/// context: the completion entry is written on every exit path, including
/// early returns and unwinding. Directories are never removed.
pub struct ExperimentGuard {
    experiment: Experiment,
    lifecycle: Lifecycle,
    failure: Option<String>,
}

impl ExperimentGuard {
    pub(crate) fn new(experiment: Experiment, mut lifecycle: Lifecycle) -> Self {
        lifecycle.advance(ContextState::Active);
        Self {
            experiment,
            lifecycle,
            failure: None,
        }
    }

    /// Returns the experiment.
    #[must_use]
    pub const fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ContextState {
        self.lifecycle.state()
    }

    /// Records that the scoped body failed; the reason is logged on close.
    pub fn fail(&mut self, reason: impl fmt::Display) {
        self.failure = Some(reason.to_string());
    }

    /// Closes the context now and returns the experiment handle.
    pub fn close(mut self) -> Experiment {
        self.finish();
        self.experiment.clone()
    }

    fn finish(&mut self) {
        if self.lifecycle.state() == ContextState::Closed {
            return;
        }

        let logger = self.experiment.logger();
        if let Some(reason) = self.failure.take() {
            logger.error(format!("Experiment body failed: {reason}"));
        } else if std::thread::panicking() {
            logger.error("Experiment body panicked.");
        }
        logger.info(COMPLETION_MESSAGE);

        self.lifecycle.advance(ContextState::Closed);
    }
}

impl Deref for ExperimentGuard {
    type Target = Experiment;

    fn deref(&self) -> &Self::Target {
        &self.experiment
    }
}

impl Drop for ExperimentGuard {
    fn drop(&mut self) {
        self.finish();
    }
}

impl fmt::Debug for ExperimentGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentGuard")
            .field("experiment", &self.experiment.name())
            .field("state", &self.lifecycle.state())
            .finish_non_exhaustive()
    }
}
