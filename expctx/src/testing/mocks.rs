//! Stand-ins for the interactive and version-control collaborators.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::confirm::Confirm;
use crate::errors::Result;
use crate::vcs::{SourceTree, TreeStatus};

/// A confirmation that answers from a script and records every prompt.
///
/// Clones share state, so a test can keep one clone and hand another to a
/// context.
#[derive(Debug, Clone)]
pub struct ScriptedConfirm {
    answers: Arc<Mutex<VecDeque<bool>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    fallback: bool,
}

impl ScriptedConfirm {
    /// Answers with `answers` in order, then confirms everything else.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            fallback: true,
        }
    }

    /// Always gives the same answer.
    #[must_use]
    pub fn always(answer: bool) -> Self {
        Self {
            fallback: answer,
            ..Self::new([])
        }
    }

    /// Returns the prompts shown so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Returns the number of prompts shown so far.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

impl Default for ScriptedConfirm {
    fn default() -> Self {
        Self::always(true)
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.answers.lock().pop_front().unwrap_or(self.fallback))
    }
}

/// An in-memory source tree with a settable status.
#[derive(Debug, Clone)]
pub struct FakeSourceTree {
    root: PathBuf,
    changes: Arc<Mutex<Vec<String>>>,
    commit: Option<String>,
    status_calls: Arc<AtomicUsize>,
}

impl FakeSourceTree {
    /// A clean tree at `root`.
    #[must_use]
    pub fn clean(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            changes: Arc::new(Mutex::new(Vec::new())),
            commit: None,
            status_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A tree at `root` reporting the given porcelain changes.
    #[must_use]
    pub fn dirty(root: impl Into<PathBuf>, changes: &[&str]) -> Self {
        let tree = Self::clean(root);
        tree.set_changes(changes);
        tree
    }

    /// Sets the commit reported as HEAD.
    #[must_use]
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// Replaces the reported changes.
    pub fn set_changes(&self, changes: &[&str]) {
        *self.changes.lock() = changes.iter().map(|c| (*c).to_string()).collect();
    }

    /// Returns how many times the status was queried.
    #[must_use]
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

impl SourceTree for FakeSourceTree {
    fn root(&self) -> PathBuf {
        self.root.clone()
    }

    fn status(&self) -> Result<TreeStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TreeStatus::with_changes(self.changes.lock().clone()))
    }

    fn head_commit(&self) -> Result<Option<String>> {
        Ok(self.commit.clone())
    }
}
