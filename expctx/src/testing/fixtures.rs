//! Filesystem fixtures for context tests.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::mocks::{FakeSourceTree, ScriptedConfirm};
use crate::config::ExperimentConfig;
use crate::context::{PersistentExperimentContext, TemporaryExperimentContext};
use crate::errors::Result;
use crate::logging::{ConsoleTarget, SharedBuffer};

/// A throwaway directory holding a source root, an experiments root and a
/// temporary root, plus a captured console.
///
/// Everything is removed when the workspace is dropped.
#[derive(Debug)]
pub struct TestWorkspace {
    dir: TempDir,
    console: SharedBuffer,
}

impl TestWorkspace {
    /// Creates the workspace directories.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("expctx-test-").tempdir()?;
        std::fs::create_dir_all(dir.path().join("project"))?;
        Ok(Self {
            dir,
            console: SharedBuffer::new(),
        })
    }

    /// Returns the workspace root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the source root.
    #[must_use]
    pub fn source_root(&self) -> PathBuf {
        self.dir.path().join("project")
    }

    /// Returns the experiments root.
    #[must_use]
    pub fn experiments_root(&self) -> PathBuf {
        self.dir.path().join("experiments")
    }

    /// Returns the temporary root.
    #[must_use]
    pub fn temporary_root(&self) -> PathBuf {
        self.dir.path().join("scratch")
    }

    /// Returns the captured console.
    #[must_use]
    pub const fn console(&self) -> &SharedBuffer {
        &self.console
    }

    /// Returns a configuration pointing into the workspace.
    #[must_use]
    pub fn config(&self) -> ExperimentConfig {
        ExperimentConfig::new()
            .with_source_root(self.source_root())
            .with_experiments_root(self.experiments_root())
            .with_temporary_root(self.temporary_root())
    }

    /// Returns a clean fake source tree rooted at the source root.
    #[must_use]
    pub fn clean_tree(&self) -> FakeSourceTree {
        FakeSourceTree::clean(self.source_root()).with_commit("0000000000000000000000000000000000000000")
    }

    /// Builds a persistent context wired to the workspace console.
    #[must_use]
    pub fn persistent(
        &self,
        source: FakeSourceTree,
        confirm: ScriptedConfirm,
    ) -> PersistentExperimentContext {
        PersistentExperimentContext::new(self.config())
            .with_source_tree(source)
            .with_confirm(confirm)
            .with_console(ConsoleTarget::Buffer(self.console.clone()))
    }

    /// Builds a temporary context wired to the workspace console.
    #[must_use]
    pub fn temporary(&self, confirm: ScriptedConfirm) -> TemporaryExperimentContext {
        TemporaryExperimentContext::new(self.config())
            .with_confirm(confirm)
            .with_console(ConsoleTarget::Buffer(self.console.clone()))
    }
}
