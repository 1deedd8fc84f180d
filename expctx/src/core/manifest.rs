//! Run manifest: provenance written next to the args blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::args::PersistedArgs;
use super::state::ExperimentKind;
use crate::errors::Result;

/// Provenance of a single context entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Unique id of this entry.
    pub run_id: Uuid,
    /// Experiment name.
    pub name: String,
    /// Persistent or temporary.
    pub kind: ExperimentKind,
    /// When the context was entered.
    pub created_at: DateTime<Utc>,
    /// Run root directory.
    pub path: PathBuf,
    /// Source tree the run was launched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<PathBuf>,
    /// Commit checked out in the source tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Args blob file name, relative to `data`.
    pub args_file: String,
    /// Hex SHA-256 of the args blob.
    pub args_sha256: String,
}

impl RunManifest {
    /// Creates a manifest for a run whose args have been persisted.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: ExperimentKind,
        path: impl Into<PathBuf>,
        args: &PersistedArgs,
    ) -> Self {
        let args_file = args
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            run_id: Uuid::new_v4(),
            name: name.into(),
            kind,
            created_at: Utc::now(),
            path: path.into(),
            source_root: None,
            commit: None,
            args_file,
            args_sha256: args.sha256.clone(),
        }
    }

    /// Records the source tree and its checked-out commit.
    #[must_use]
    pub fn with_source(mut self, root: impl Into<PathBuf>, commit: Option<String>) -> Self {
        self.source_root = Some(root.into());
        self.commit = commit;
        self
    }

    /// Writes the manifest as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Reads a manifest back.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
