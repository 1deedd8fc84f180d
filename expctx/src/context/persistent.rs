//! Persistent experiments: named runs tied to a clean commit.

use serde::Serialize;
use std::fmt;

use super::guard::{ExperimentGuard, Lifecycle};
use super::setup::{Provenance, RunSetup};
use crate::config::ExperimentConfig;
use crate::confirm::{Confirm, TerminalConfirm};
use crate::core::{validate_name, ContextState, Experiment, ExperimentKind, RunLayout};
use crate::errors::{DirtyRepositoryError, ExperimentError, Result};
use crate::logging::ConsoleTarget;
use crate::vcs::{GitWorkTree, SourceTree};

/// Creates experiments under the configured experiments root.
///
/// Entry refuses to proceed unless the source tree is clean, so every
/// stored result can be traced back to an exact revision.
///
/// ```rust,no_run
/// use expctx::prelude::*;
/// use serde_json::json;
///
/// let context = PersistentExperimentContext::new(ExperimentConfig::default());
/// let experiment = context.enter("lr_sweep", &json!({"lr": 0.01, "epochs": 20}))?;
/// experiment.logger().info("starting training");
/// # Ok::<(), expctx::ExperimentError>(())
/// ```
pub struct PersistentExperimentContext {
    config: ExperimentConfig,
    source: Box<dyn SourceTree>,
    confirm: Box<dyn Confirm>,
    console: ConsoleTarget,
}

impl PersistentExperimentContext {
    /// Creates a context that checks the configured source root with git and
    /// asks for confirmation on the terminal.
    #[must_use]
    pub fn new(config: ExperimentConfig) -> Self {
        let source = GitWorkTree::new(config.source_root.clone())
            .ignore_untracked(config.ignore_untracked);
        Self {
            config,
            source: Box::new(source),
            confirm: Box::new(TerminalConfirm),
            console: ConsoleTarget::default(),
        }
    }

    /// Replaces the source tree collaborator.
    #[must_use]
    pub fn with_source_tree(mut self, source: impl SourceTree + 'static) -> Self {
        self.source = Box::new(source);
        self
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

    /// Enters the experiment `name` and persists `args`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `name` is empty or not a single path component
    /// - `DirtyRepository` if the source tree has uncommitted changes; no
    ///   directory is created in that case
    /// - `Aborted` if the operator declines reusing an existing data directory
    /// - `Serialization` if `args` is not an encodable mapping
    /// - `Io` for filesystem failures
    pub fn enter<A>(&self, name: &str, args: &A) -> Result<ExperimentGuard>
    where
        A: Serialize + ?Sized,
    {
        let mut lifecycle = Lifecycle::new(name);
        lifecycle.advance(ContextState::Validating);

        validate_name(name)?;
        let status = self.source.status()?;
        if !status.is_clean() {
            return Err(DirtyRepositoryError::new(self.source.root(), status.changes).into());
        }
        let commit = self.source.head_commit()?;

        let layout = RunLayout::new(self.config.experiments_root().join(name));
        if layout.data_exists() {
            let prompt = format!(
                "{} already exists, risk of overwriting existing data! Proceed anyway?",
                layout.data_dir().display()
            );
            tracing::warn!(experiment = name, "{}", prompt);
            if !self.confirm.confirm(&prompt)? {
                return Err(ExperimentError::Aborted(format!(
                    "declined to reuse {}",
                    layout.data_dir().display()
                )));
            }
        }

        let experiment = RunSetup {
            name,
            kind: ExperimentKind::Persistent,
            layout,
            provenance: Some(Provenance {
                root: self.source.root(),
                commit,
            }),
            config: &self.config,
            console: &self.console,
        }
        .run(args, &mut lifecycle)?;

        experiment.logger().info(format!(
            "Created a new persistent experiment at path {}.",
            experiment.path().display()
        ));

        Ok(ExperimentGuard::new(experiment, lifecycle))
    }

    /// Enters `name`, runs `body`, and closes the context.
    ///
    /// `tracing` macros used inside `body` are written to the experiment's
    /// sinks. The completion entry is written whether `body` succeeds or not.
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

impl fmt::Debug for PersistentExperimentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentExperimentContext")
            .field("config", &self.config)
            .field("source_root", &self.source.root())
            .field("console", &self.console)
            .finish_non_exhaustive()
    }
}
