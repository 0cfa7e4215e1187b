use log::debug;
use std::path::Path;
use std::process::Command;

use crate::domain::{CommitAuthor, GitError, VersionControl};

use super::repo;

const GIT: &str = "git";

/// Branch assumed when the remote does not advertise its `HEAD`
pub const FALLBACK_BRANCH: &str = "main";

/// [`VersionControl`] backed by the `git` executable on the `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    /// Build a git command running inside `dir`.
    fn command(dir: &Path) -> Command {
        let mut command = Command::new(GIT);
        command.current_dir(dir).env("GIT_TERMINAL_PROMPT", "0");
        command
    }

    /// Run a prepared git command and return its trimmed standard output.
    fn run(step: &'static str, command: &mut Command) -> Result<String, GitError> {
        debug!("git {step}");
        let output = command
            .output()
            .map_err(|source| GitError::Spawn { step, source })?;

        if !output.status.success() {
            return Err(GitError::Command {
                step,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}

impl VersionControl for GitCli {
    fn clone_repository(&self, url: &str, destination: &Path) -> Result<(), GitError> {
        let mut command = Command::new(GIT);
        command
            .env("GIT_TERMINAL_PROMPT", "0")
            .arg("clone")
            .arg(url)
            .arg(destination);

        Self::run("clone", &mut command).map_err(|err| match err {
            GitError::Command { stderr, .. } => GitError::Clone {
                url: url.to_owned(),
                stderr,
            },
            other @ (GitError::Spawn { .. }
            | GitError::Clone { .. }
            | GitError::NotAWorkTree { .. }) => other,
        })?;

        repo::ensure_work_tree(destination).map_err(|err| GitError::NotAWorkTree {
            path: destination.to_path_buf(),
            reason: err.to_string(),
        })?;

        Ok(())
    }

    fn default_branch(&self, work_tree: &Path) -> Result<String, GitError> {
        let mut command = Self::command(work_tree);
        command.args(["symbolic-ref", "--short", "refs/remotes/origin/HEAD"]);

        match Self::run("symbolic-ref", &mut command) {
            Ok(reference) => Ok(remote_branch_name(&reference).to_owned()),
            Err(GitError::Command { stderr, .. }) => {
                debug!("remote HEAD unknown ({stderr}), assuming {FALLBACK_BRANCH}");
                Ok(FALLBACK_BRANCH.to_owned())
            }
            Err(err) => Err(err),
        }
    }

    fn publish_branch(
        &self,
        work_tree: &Path,
        branch: &str,
        message: &str,
        author: &CommitAuthor,
    ) -> Result<(), GitError> {
        Self::run(
            "config user.name",
            Self::command(work_tree).args(["config", "user.name", author.name.as_str()]),
        )?;
        Self::run(
            "config user.email",
            Self::command(work_tree).args(["config", "user.email", author.email.as_str()]),
        )?;
        Self::run(
            "checkout",
            Self::command(work_tree).args(["checkout", "-b", branch]),
        )?;
        Self::run("add", Self::command(work_tree).args(["add", "--all"]))?;
        Self::run(
            "commit",
            Self::command(work_tree).args(["commit", "-m", message]),
        )?;
        // An empty lease value requires the remote branch to be absent.
        let lease = format!("--force-with-lease=refs/heads/{branch}:");
        Self::run(
            "push",
            Self::command(work_tree).args([
                "push",
                lease.as_str(),
                "--set-upstream",
                "origin",
                branch,
            ]),
        )?;
        Ok(())
    }
}

/// Strip the remote prefix from a short remote-tracking ref (`origin/main` -> `main`).
fn remote_branch_name(reference: &str) -> &str {
    reference
        .split_once('/')
        .map_or(reference, |(_remote, branch)| branch)
}
