use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when driving the version control tool
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git {step}")]
    Spawn {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to clone {url}: {stderr}")]
    Clone { url: String, stderr: String },

    #[error("clone at {} is not a usable work tree: {reason}", path.display())]
    NotAWorkTree { path: PathBuf, reason: String },

    #[error("git {step} failed: {stderr}")]
    Command { step: &'static str, stderr: String },
}

/// Identity recorded on commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// Trait for the version control operations of a run
pub trait VersionControl {
    /// Clone `url` into `destination`, which must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the clone fails or does not produce a work tree.
    fn clone_repository(&self, url: &str, destination: &Path) -> Result<(), GitError>;

    /// Name of the branch the remote `HEAD` points to.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be run.
    fn default_branch(&self, work_tree: &Path) -> Result<String, GitError>;

    /// Commit every change of the work tree on a new `branch` and push it upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails, including when `branch` already exists.
    fn publish_branch(
        &self,
        work_tree: &Path,
        branch: &str,
        message: &str,
        author: &CommitAuthor,
    ) -> Result<(), GitError>;
}
