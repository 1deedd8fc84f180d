//! Git checkout inspected through the `git` CLI.

use std::path::PathBuf;
use std::process::{Command, Output};

use super::{SourceTree, TreeStatus};
use crate::errors::{ExperimentError, Result};

/// A git working tree.
///
/// Untracked files are ignored by default: only tracked content makes the
/// tree dirty.
#[derive(Debug, Clone)]
pub struct GitWorkTree {
    root: PathBuf,
    ignore_untracked: bool,
}

impl GitWorkTree {
    /// Creates a handle for the checkout at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_untracked: true,
        }
    }

    /// Sets whether untracked files count as changes.
    #[must_use]
    pub const fn ignore_untracked(mut self, ignore: bool) -> Self {
        self.ignore_untracked = ignore;
        self
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|err| ExperimentError::VersionControl(format!("failed to run git: {err}")))
    }

    fn failure(&self, command: &str, output: &Output) -> ExperimentError {
        ExperimentError::VersionControl(format!(
            "`git {command}` failed in {}: {}",
            self.root.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }
}

impl SourceTree for GitWorkTree {
    fn root(&self) -> PathBuf {
        self.root.clone()
    }

    fn status(&self) -> Result<TreeStatus> {
        let untracked = if self.ignore_untracked {
            "--untracked-files=no"
        } else {
            "--untracked-files=all"
        };
        let output = self.git(&["status", "--porcelain", untracked])?;
        if !output.status.success() {
            return Err(self.failure("status", &output));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(TreeStatus::with_changes(parse_porcelain(&stdout)))
    }

    fn head_commit(&self) -> Result<Option<String>> {
        let output = self.git(&["rev-parse", "--verify", "--quiet", "HEAD"])?;
        if output.status.success() {
            let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Ok(Some(commit));
        }
        // --quiet exits 1 when HEAD does not resolve yet (no commits).
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        Err(self.failure("rev-parse", &output))
    }
}

/// Splits `git status --porcelain` output into one entry per change.
#[must_use]
pub fn parse_porcelain(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run_git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    #[test]
    fn test_parse_porcelain() {
        let out = " M src/lib.rs\nA  docs/notes.md\n\n?? scratch.txt\n";
        assert_eq!(
            parse_porcelain(out),
            vec![" M src/lib.rs", "A  docs/notes.md", "?? scratch.txt"]
        );
        assert!(parse_porcelain("").is_empty());
    }

    #[test]
    fn test_fresh_repository_is_clean_without_head() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init", "--quiet"]);

        let tree = GitWorkTree::new(dir.path());
        assert!(tree.status().unwrap().is_clean());
        assert_eq!(tree.head_commit().unwrap(), None);
    }

    #[test]
    fn test_untracked_files_respect_setting() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init", "--quiet"]);
        fs::write(dir.path().join("scratch.txt"), "notes").unwrap();

        assert!(GitWorkTree::new(dir.path()).status().unwrap().is_clean());

        let strict = GitWorkTree::new(dir.path()).ignore_untracked(false);
        let status = strict.status().unwrap();
        assert_eq!(status.changes, vec!["?? scratch.txt"]);
    }

    #[test]
    fn test_staged_file_is_dirty() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init", "--quiet"]);
        fs::write(dir.path().join("model.py"), "x = 1").unwrap();
        run_git(dir.path(), &["add", "model.py"]);

        let status = GitWorkTree::new(dir.path()).status().unwrap();
        assert!(!status.is_clean());
        assert!(status.changes[0].ends_with("model.py"));
    }

    #[test]
    fn test_not_a_repository_is_error() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let err = GitWorkTree::new(dir.path().join("missing")).status().unwrap_err();
        assert!(matches!(err, ExperimentError::VersionControl(_)));
    }
}
