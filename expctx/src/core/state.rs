//! Context lifecycle state and experiment kind enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an experiment's directory is meant to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentKind {
    /// Named run under the experiments root, tied to a clean commit.
    Persistent,
    /// Run in scratch storage with no durability guarantee.
    Temporary,
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistent => write!(f, "persistent"),
            Self::Temporary => write!(f, "temporary"),
        }
    }
}

/// Progress of a context from entry to exit.
///
/// States only move forward, one step at a time. A failure before
/// [`ContextState::Active`] aborts the entry without rolling back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextState {
    /// Nothing has happened yet.
    Uninitialized,
    /// Checking the name and the source tree.
    Validating,
    /// `data` and `code` exist.
    DirectoryReady,
    /// The args blob is on disk.
    ArgsPersisted,
    /// File and console sinks are attached.
    LoggingAttached,
    /// The experiment handle has been yielded.
    Active,
    /// The completion entry has been written.
    Closed,
}

impl Default for ContextState {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl ContextState {
    /// Returns the state that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Uninitialized => Some(Self::Validating),
            Self::Validating => Some(Self::DirectoryReady),
            Self::DirectoryReady => Some(Self::ArgsPersisted),
            Self::ArgsPersisted => Some(Self::LoggingAttached),
            Self::LoggingAttached => Some(Self::Active),
            Self::Active => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Returns true if moving to `target` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns true once the handle has been yielded.
    #[must_use]
    pub fn is_entered(self) -> bool {
        self >= Self::Active
    }
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Validating => write!(f, "validating"),
            Self::DirectoryReady => write!(f, "directory_ready"),
            Self::ArgsPersisted => write!(f, "args_persisted"),
            Self::LoggingAttached => write!(f, "logging_attached"),
            Self::Active => write!(f, "active"),
            Self::Closed => write!(f, "closed"),
        }
    }
}
