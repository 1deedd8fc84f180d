//! Steps shared by both contexts once preconditions have passed.

use serde::Serialize;
use std::path::PathBuf;

use super::guard::Lifecycle;
use crate::config::ExperimentConfig;
use crate::core::{persist_args, ContextState, Experiment, ExperimentKind, RunLayout, RunManifest};
use crate::errors::Result;
use crate::logging::{ConsoleTarget, LoggerHandle};

/// Source tree recorded in the manifest of a persistent run.
#[derive(Debug, Clone)]
pub(crate) struct Provenance {
    pub root: PathBuf,
    pub commit: Option<String>,
}

/// Directory, args, manifest and logger setup for one entry.
pub(crate) struct RunSetup<'a> {
    pub name: &'a str,
    pub kind: ExperimentKind,
    pub layout: RunLayout,
    pub provenance: Option<Provenance>,
    pub config: &'a ExperimentConfig,
    pub console: &'a ConsoleTarget,
}

impl RunSetup<'_> {
    /// Runs `DirectoryReady -> ArgsPersisted -> LoggingAttached`.
    ///
    /// A failure leaves whatever was already created on disk.
    pub(crate) fn run<A>(self, args: &A, lifecycle: &mut Lifecycle) -> Result<Experiment>
    where
        A: Serialize + ?Sized,
    {
        let reused = self.layout.data_exists();
        self.layout.ensure()?;
        lifecycle.advance(ContextState::DirectoryReady);

        let persisted = persist_args(&self.layout.args_path(), args)?;
        let mut manifest =
            RunManifest::new(self.name, self.kind, self.layout.root(), &persisted);
        if let Some(provenance) = self.provenance {
            manifest = manifest.with_source(provenance.root, provenance.commit);
        }
        manifest.write(&self.layout.manifest_path())?;
        lifecycle.advance(ContextState::ArgsPersisted);

        let logger = LoggerHandle::builder(self.name, self.layout.log_path(self.name))
            .file_level(self.config.file_level)
            .console_level(self.config.console_level)
            .console(self.console.clone())
            .attach()?;
        lifecycle.advance(ContextState::LoggingAttached);

        if reused {
            logger.warning(format!(
                "Reusing existing data directory {}; previous artifacts may be overwritten.",
                self.layout.data_dir().display()
            ));
        }
        logger.debug(format!(
            "Run {} persisted {} bytes of arguments to {} (sha256 {})",
            manifest.run_id,
            persisted.len,
            persisted.path.display(),
            persisted.sha256
        ));

        Ok(Experiment::new(self.name, self.kind, self.layout, logger))
    }
}
