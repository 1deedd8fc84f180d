//! Configuration for experiment contexts.
//!
//! The defaults follow the layout of a typical research checkout: sources
//! under `~/dev/project`, and an `experiments` directory inside it (usually a
//! symlink to larger scratch storage) holding one folder per persistent run.
//!
//! The only environment lookup is `HOME`, used to resolve the default
//! `source_root` when none is given. Set `source_root` explicitly to make a
//! configuration independent of the environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ExperimentError, Result};
use crate::logging::LogLevel;

/// Default name of a temporary experiment.
pub const DEFAULT_TEMPORARY_NAME: &str = "temporary_experiment";

/// Configuration shared by persistent and temporary contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Root of the version-controlled source tree.
    /// Defaults to `$HOME/dev/project`, or `./dev/project` without `HOME`.
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,
    /// Directory holding persistent experiments.
    /// Defaults to `<source_root>/experiments` when unset.
    #[serde(default)]
    pub experiments_root: Option<PathBuf>,
    /// Parent directory for temporary experiments.
    /// Defaults to the OS temporary directory when unset.
    #[serde(default)]
    pub temporary_root: Option<PathBuf>,
    /// Prefix for temporary experiment directory names.
    #[serde(default = "default_temporary_prefix")]
    pub temporary_prefix: String,
    /// Minimum level written to the log file.
    #[serde(default = "default_file_level")]
    pub file_level: LogLevel,
    /// Minimum level written to the console.
    #[serde(default = "default_console_level")]
    pub console_level: LogLevel,
    /// Whether untracked files are ignored by the cleanliness check.
    #[serde(default = "default_ignore_untracked")]
    pub ignore_untracked: bool,
}

fn default_source_root() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join("dev")
        .join("project")
}

fn default_temporary_prefix() -> String {
    "experiment-".to_string()
}

const fn default_file_level() -> LogLevel {
    LogLevel::Debug
}

const fn default_console_level() -> LogLevel {
    LogLevel::Info
}

const fn default_ignore_untracked() -> bool {
    true
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            experiments_root: None,
            temporary_root: None,
            temporary_prefix: default_temporary_prefix(),
            file_level: default_file_level(),
            console_level: default_console_level(),
            ignore_untracked: default_ignore_untracked(),
        }
    }
}

impl ExperimentConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// Malformed input is an `InvalidArgument` error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| {
            ExperimentError::invalid_argument(format!("invalid configuration: {err}"))
        })
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Sets the source tree root.
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    /// Sets the experiments root.
    #[must_use]
    pub fn with_experiments_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.experiments_root = Some(root.into());
        self
    }

    /// Sets the parent directory of temporary experiments.
    #[must_use]
    pub fn with_temporary_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temporary_root = Some(root.into());
        self
    }

    /// Sets the temporary directory prefix.
    #[must_use]
    pub fn with_temporary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temporary_prefix = prefix.into();
        self
    }

    /// Sets the file sink level.
    #[must_use]
    pub const fn with_file_level(mut self, level: LogLevel) -> Self {
        self.file_level = level;
        self
    }

    /// Sets the console sink level.
    #[must_use]
    pub const fn with_console_level(mut self, level: LogLevel) -> Self {
        self.console_level = level;
        self
    }

    /// Sets whether untracked files are ignored by the cleanliness check.
    #[must_use]
    pub const fn with_ignore_untracked(mut self, ignore: bool) -> Self {
        self.ignore_untracked = ignore;
        self
    }

    /// Returns the resolved experiments root.
    #[must_use]
    pub fn experiments_root(&self) -> PathBuf {
        self.experiments_root
            .clone()
            .unwrap_or_else(|| self.source_root.join("experiments"))
    }

    /// Returns the resolved parent directory for temporary experiments.
    #[must_use]
    pub fn temporary_root(&self) -> PathBuf {
        self.temporary_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_levels() {
        let config = ExperimentConfig::default();
        assert_eq!(config.file_level, LogLevel::Debug);
        assert_eq!(config.console_level, LogLevel::Info);
        assert!(config.ignore_untracked);
        assert!(config.source_root.ends_with("dev/project"));
    }

    #[test]
    fn test_experiments_root_defaults_under_source() {
        let config = ExperimentConfig::new().with_source_root("/work/project");
        assert_eq!(
            config.experiments_root(),
            PathBuf::from("/work/project/experiments")
        );

        let config = config.with_experiments_root("/scratch/exps");
        assert_eq!(config.experiments_root(), PathBuf::from("/scratch/exps"));
    }

    #[test]
    fn test_temporary_root_defaults_to_os_temp() {
        let config = ExperimentConfig::new();
        assert_eq!(config.temporary_root(), std::env::temp_dir());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = ExperimentConfig::from_json_str(
            r#"{"source_root": "/src", "console_level": "warning"}"#,
        )
        .unwrap();

        assert_eq!(config.source_root, PathBuf::from("/src"));
        assert_eq!(config.console_level, LogLevel::Warning);
        assert_eq!(config.file_level, LogLevel::Debug);
        assert_eq!(config.temporary_prefix, "experiment-");
        assert!(config.experiments_root.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expctx.json");
        fs::write(&path, r#"{"experiments_root": "/scratch/exps"}"#).unwrap();

        let config = ExperimentConfig::load(&path).unwrap();
        assert_eq!(config.experiments_root(), PathBuf::from("/scratch/exps"));
    }

    #[test]
    fn test_invalid_json_is_invalid_argument() {
        let err = ExperimentConfig::from_json_str("{").unwrap_err();
        match err {
            ExperimentError::InvalidArgument(msg) => {
                assert!(msg.starts_with("invalid configuration: "), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = ExperimentConfig::from_json_str(r#"{"file_level": "verbose"}"#).unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidArgument(_)));
    }

    #[test]
    fn test_default_source_root_resolves_home() {
        let expected = std::env::var_os("HOME")
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
            .join("dev/project");
        assert_eq!(ExperimentConfig::default().source_root, expected);

        let explicit = ExperimentConfig::from_json_str(r#"{"source_root": "/src"}"#).unwrap();
        assert_eq!(explicit.source_root, PathBuf::from("/src"));
    }
}
