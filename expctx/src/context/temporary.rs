//! Temporary experiments: runs in scratch storage.

use serde::Serialize;
use std::fmt;
use std::fs;

use super::guard::{ExperimentGuard, Lifecycle};
use super::setup::RunSetup;
use crate::config::{ExperimentConfig, DEFAULT_TEMPORARY_NAME};
use crate::confirm::{Confirm, TerminalConfirm};
use crate::core::{validate_name, ContextState, Experiment, ExperimentKind, RunLayout};
use crate::errors::{ExperimentError, Result};
use crate::logging::ConsoleTarget;

/// Warning shown before a temporary experiment starts.
pub const TEMPORARY_WARNING: &str =
    "This is a temporary experiment. Results will *not* be saved to disk. Proceed?";

/// Creates experiments in a fresh directory under the temporary root.
///
/// No source tree check is made. The directory is kept after exit so its
/// artifacts can be inspected; removing it is up to the caller.
pub struct TemporaryExperimentContext {
    config: ExperimentConfig,
    confirm: Box<dyn Confirm>,
    console: ConsoleTarget,
}

impl TemporaryExperimentContext {
    /// Creates a context that asks for confirmation on the terminal.
    #[must_use]
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            confirm: Box::new(TerminalConfirm),
            console: ConsoleTarget::default(),
        }
    }

    /// Replaces the confirmation capability.
    #[must_use]
    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    /// Sets where the console sink writes.
    #[must_use]
    pub fn with_console(mut self, console: ConsoleTarget) -> Self {
        self.console = console;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Enters `temporary_experiment` with an empty argument mapping.
    pub fn enter_default(&self) -> Result<ExperimentGuard> {
        self.enter(DEFAULT_TEMPORARY_NAME, &serde_json::Map::new())
    }

    /// Enters a temporary experiment named `name` and persists `args`.
    ///
    /// The operator is always asked to confirm, after logging is attached.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `name` is empty or not a single path component
    /// - `Serialization` if `args` is not an encodable mapping
    /// - `Aborted` if the operator declines; the directory is left in place
    /// - `Io` for filesystem failures
    pub fn enter<A>(&self, name: &str, args: &A) -> Result<ExperimentGuard>
    where
        A: Serialize + ?Sized,
    {
        let mut lifecycle = Lifecycle::new(name);
        lifecycle.advance(ContextState::Validating);
        validate_name(name)?;

        let parent = self.config.temporary_root();
        fs::create_dir_all(&parent)?;
        let root = tempfile::Builder::new()
            .prefix(&self.config.temporary_prefix)
            .tempdir_in(&parent)?
            .keep();

        let experiment = RunSetup {
            name,
            kind: ExperimentKind::Temporary,
            layout: RunLayout::new(root),
            provenance: None,
            config: &self.config,
            console: &self.console,
        }
        .run(args, &mut lifecycle)?;

        let logger = experiment.logger();
        logger.warning(TEMPORARY_WARNING);
        if !self.confirm.confirm(TEMPORARY_WARNING)? {
            logger.error("Temporary experiment declined by operator.");
            return Err(ExperimentError::Aborted(format!(
                "declined temporary experiment at {}",
                experiment.path().display()
            )));
        }

        logger.info(format!(
            "Created a new temporary experiment at path {}.",
            experiment.path().display()
        ));

        Ok(ExperimentGuard::new(experiment, lifecycle))
    }

    /// Enters `name`, runs `body`, and closes the context.
    pub fn scope<A, F, R, E>(&self, name: &str, args: &A, body: F) -> std::result::Result<R, E>
    where
        A: Serialize + ?Sized,
        F: FnOnce(&Experiment) -> std::result::Result<R, E>,
        E: From<ExperimentError> + fmt::Display,
    {
        let guard = self.enter(name, args)?;
        super::run_body(guard, body)
    }
}

impl fmt::Debug for TemporaryExperimentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryExperimentContext")
            .field("config", &self.config)
            .field("console", &self.console)
            .finish_non_exhaustive()
    }
}
