//! Error types for experiment contexts.
//!
//! Every failure that can abort a context entry maps onto one variant of
//! [`ExperimentError`]. Filesystem errors are carried through unmodified.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExperimentError>;

/// The main error type for experiment context operations.
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// A caller-supplied argument was rejected (e.g. an empty experiment name
    /// or a malformed configuration file).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The source tree has uncommitted changes.
    #[error("{0}")]
    DirtyRepository(#[from] DirtyRepositoryError),

    /// The run arguments or manifest could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The version control collaborator could not answer.
    #[error("Version control error: {0}")]
    VersionControl(String),

    /// The operator declined a confirmation prompt.
    #[error("Aborted by operator: {0}")]
    Aborted(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExperimentError {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns true if this error was raised by a failed precondition
    /// rather than by the filesystem or an encoder.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::DirtyRepository(_) | Self::Aborted(_)
        )
    }
}

impl From<serde_json::Error> for ExperimentError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

/// Error raised when a persistent experiment is requested against a source
/// tree with staged or unstaged modifications.
#[derive(Debug, Clone, Error)]
#[error("Repository at {} has uncommitted changes: {}", root.display(), changes.join(", "))]
pub struct DirtyRepositoryError {
    /// Root of the checkout that was inspected.
    pub root: PathBuf,
    /// Porcelain status lines describing each change.
    pub changes: Vec<String>,
}

impl DirtyRepositoryError {
    /// Creates a new dirty repository error.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, changes: Vec<String>) -> Self {
        Self {
            root: root.into(),
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_repository_message_lists_changes() {
        let err = DirtyRepositoryError::new(
            "/home/me/dev/project",
            vec![" M src/lib.rs".to_string(), "A  notes.md".to_string()],
        );
        let msg = err.to_string();
        assert!(msg.contains("/home/me/dev/project"));
        assert!(msg.contains("src/lib.rs"));
        assert!(msg.contains("notes.md"));
    }

    #[test]
    fn test_dirty_repository_converts() {
        let err: ExperimentError = DirtyRepositoryError::new("/tmp/x", Vec::new()).into();
        assert!(matches!(err, ExperimentError::DirtyRepository(_)));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_serde_json_error_maps_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ExperimentError = parse_err.into();
        assert!(matches!(err, ExperimentError::Serialization(_)));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_io_error_passes_through() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ExperimentError = io.into();
        match err {
            ExperimentError::Io(inner) => {
                assert_eq!(inner.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
