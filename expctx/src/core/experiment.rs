//! The experiment handle yielded to the caller.

use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::args::load_args;
use super::layout::{validate_name, RunLayout};
use super::manifest::RunManifest;
use super::state::ExperimentKind;
use crate::errors::Result;
use crate::logging::LoggerHandle;

/// Directory names never copied into a code snapshot.
pub const SNAPSHOT_EXCLUDES: &[&str] = &[".git", "target"];

/// A named run with its root directory and logger.
///
/// Immutable once yielded. The backing directory outlives the handle.
#[derive(Debug, Clone)]
pub struct Experiment {
    name: String,
    kind: ExperimentKind,
    layout: RunLayout,
    logger: LoggerHandle,
}

impl Experiment {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: ExperimentKind,
        layout: RunLayout,
        logger: LoggerHandle,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            layout,
            logger,
        }
    }

    /// Returns the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the root folder of the experiment.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.layout.root()
    }

    /// Returns whether this is a persistent or temporary run.
    #[must_use]
    pub const fn kind(&self) -> ExperimentKind {
        self.kind
    }

    /// Returns the run layout.
    #[must_use]
    pub const fn layout(&self) -> &RunLayout {
        &self.layout
    }

    /// Returns the artifact directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.layout.data_dir()
    }

    /// Returns the code snapshot directory.
    #[must_use]
    pub fn code_dir(&self) -> PathBuf {
        self.layout.code_dir()
    }

    /// Returns the args blob path.
    #[must_use]
    pub fn args_path(&self) -> PathBuf {
        self.layout.args_path()
    }

    /// Returns the manifest path.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.layout.manifest_path()
    }

    /// Returns the log file path.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        self.logger.log_path()
    }

    /// Returns the experiment logger.
    #[must_use]
    pub const fn logger(&self) -> &LoggerHandle {
        &self.logger
    }

    /// Decodes the persisted args blob.
    pub fn load_args<T: DeserializeOwned>(&self) -> Result<T> {
        load_args(&self.args_path())
    }

    /// Reads the run manifest.
    pub fn load_manifest(&self) -> Result<RunManifest> {
        RunManifest::load(&self.manifest_path())
    }

    /// Copies the files under `source` into the code directory.
    ///
    /// `.git` and `target` directories, symlinks, and this experiment's own
    /// directory are skipped. Returns the number of files copied.
    pub fn snapshot_code(&self, source: &Path) -> Result<usize> {
        let code_dir = self.code_dir();
        let own_root = self.path().to_path_buf();
        let mut copied = 0;

        let walker = WalkDir::new(source).follow_links(false).into_iter();
        for entry in walker.filter_entry(|e| !is_excluded(e.path(), e.depth(), &own_root)) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
            let dest = code_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }

        self.logger.debug(format!(
            "Copied {copied} files from {} into {}",
            source.display(),
            code_dir.display()
        ));
        Ok(copied)
    }

    /// Symlinks a pre-existing asset (checkpoints, datasets) into the
    /// experiment root as `link_name`, e.g. `models`.
    pub fn link_asset(&self, target: &Path, link_name: &str) -> Result<PathBuf> {
        validate_name(link_name)?;
        let link = self.path().join(link_name);
        symlink(target, &link)?;
        self.logger.debug(format!(
            "Linked {} -> {}",
            link.display(),
            target.display()
        ));
        Ok(link)
    }
}

fn is_excluded(path: &Path, depth: usize, own_root: &Path) -> bool {
    if depth == 0 {
        return false;
    }
    let excluded_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| SNAPSHOT_EXCLUDES.contains(&n));
    excluded_name || path == own_root
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
