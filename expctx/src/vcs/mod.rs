//! Source tree status.
//!
//! Persistent experiments are only created from a clean checkout so that
//! every stored result maps to an exact code revision. The check is a
//! read-only query: nothing is staged, committed or modified.

mod git;

pub use git::{parse_porcelain, GitWorkTree};

use std::path::PathBuf;

use crate::errors::Result;

/// Uncommitted changes reported by a source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStatus {
    /// One entry per changed path, in porcelain format (`XY path`).
    pub changes: Vec<String>,
}

impl TreeStatus {
    /// A status with no changes.
    #[must_use]
    pub fn clean() -> Self {
        Self::default()
    }

    /// A status with the given changes.
    #[must_use]
    pub fn with_changes(changes: Vec<String>) -> Self {
        Self { changes }
    }

    /// Returns true if there are no uncommitted changes.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty()
    }
}

/// A version-controlled source tree.
#[cfg_attr(test, mockall::automock)]
pub trait SourceTree {
    /// Root directory of the checkout.
    fn root(&self) -> PathBuf;

    /// Reports staged and unstaged changes.
    fn status(&self) -> Result<TreeStatus>;

    /// Returns the checked-out commit, or `None` for a tree without commits.
    fn head_commit(&self) -> Result<Option<String>>;
}
