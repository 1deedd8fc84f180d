//! Experiment contexts.
//!
//! This module provides:
//! - `PersistentExperimentContext` for named runs tied to a clean commit
//! - `TemporaryExperimentContext` for runs in scratch storage
//! - `ExperimentGuard`, the scoped handle whose drop writes the exit entry

#[cfg(test)]
mod context_tests;
mod guard;
mod persistent;
mod setup;
mod temporary;

pub use guard::{ExperimentGuard, COMPLETION_MESSAGE};
pub use persistent::PersistentExperimentContext;
pub use temporary::{TemporaryExperimentContext, TEMPORARY_WARNING};

use std::fmt;

use crate::core::Experiment;

/// Runs `body` inside the experiment's logging scope, then closes `guard`.
fn run_body<F, R, E>(mut guard: ExperimentGuard, body: F) -> Result<R, E>
where
    F: FnOnce(&Experiment) -> Result<R, E>,
    E: fmt::Display,
{
    let experiment = guard.experiment().clone();
    let result = experiment.logger().in_scope(|| body(&experiment));
    if let Err(err) = &result {
        guard.fail(err);
    }
    drop(guard);
    result
}
