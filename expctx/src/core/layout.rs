//! On-disk layout of a run directory.
//!
//! ```text
//! <root>/
//!   data/   args.json, manifest.json, <name>.log, run artifacts
//!   code/   snapshot of the sources used (filled by the caller)
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::{ExperimentError, Result};

/// Artifact directory name.
pub const DATA_DIR: &str = "data";
/// Code snapshot directory name.
pub const CODE_DIR: &str = "code";
/// Serialized arguments file name.
pub const ARGS_FILE: &str = "args.json";
/// Run manifest file name.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths of a single run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    root: PathBuf,
}

impl RunLayout {
    /// Creates a layout rooted at `root`. Nothing is touched on disk.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the run root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `<root>/data`.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// Returns `<root>/code`.
    #[must_use]
    pub fn code_dir(&self) -> PathBuf {
        self.root.join(CODE_DIR)
    }

    /// Returns `<root>/data/args.json`.
    #[must_use]
    pub fn args_path(&self) -> PathBuf {
        self.data_dir().join(ARGS_FILE)
    }

    /// Returns `<root>/data/manifest.json`.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir().join(MANIFEST_FILE)
    }

    /// Returns `<root>/data/<name>.log`.
    #[must_use]
    pub fn log_path(&self, name: &str) -> PathBuf {
        self.data_dir().join(format!("{name}.log"))
    }

    /// Returns true if the data directory already exists.
    #[must_use]
    pub fn data_exists(&self) -> bool {
        self.data_dir().exists()
    }

    /// Creates `data` and `code`, accepting pre-existing directories.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(self.data_dir())?;
        fs::create_dir_all(self.code_dir())?;
        Ok(())
    }
}

/// Checks that `name` can name an experiment directory and its log file.
///
/// The name must be non-empty and a single normal path component.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ExperimentError::invalid_argument(
            "experiment name must not be empty",
        ));
    }

    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || name.contains(['/', '\\']) {
        return Err(ExperimentError::invalid_argument(format!(
            "experiment name '{name}' must be a single path component"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = RunLayout::new("/exps/run1");
        assert_eq!(layout.data_dir(), PathBuf::from("/exps/run1/data"));
        assert_eq!(layout.code_dir(), PathBuf::from("/exps/run1/code"));
        assert_eq!(layout.args_path(), PathBuf::from("/exps/run1/data/args.json"));
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/exps/run1/data/manifest.json")
        );
        assert_eq!(layout.log_path("run1"), PathBuf::from("/exps/run1/data/run1.log"));
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = RunLayout::new(dir.path().join("nested").join("run"));
        assert!(!layout.data_exists());

        layout.ensure().unwrap();
        fs::write(layout.data_dir().join("keep.txt"), "x").unwrap();
        layout.ensure().unwrap();

        assert!(layout.data_exists());
        assert!(layout.code_dir().is_dir());
        assert!(layout.data_dir().join("keep.txt").exists());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("mnist_lr_sweep").is_ok());
        assert!(validate_name("run-2026.10.19").is_ok());

        for bad in ["", ".", "..", "a/b", "../escape", "/abs", "a\\b"] {
            let err = validate_name(bad).unwrap_err();
            assert!(
                matches!(err, ExperimentError::InvalidArgument(_)),
                "{bad:?} should be rejected"
            );
        }
    }
}
