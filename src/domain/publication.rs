use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use super::RepositoryReference;

/// Branch that carries the workflow change
pub const BRANCH_NAME: &str = "enable-dependabot-auto-merge";

/// Message of the commit that adds the workflow
pub const COMMIT_MESSAGE: &str = "build: enable dependabot auto-merge";

/// Title of the pull request
pub const PULL_REQUEST_TITLE: &str = "enable dependabot auto-merge";

/// Body of the pull request
pub const PULL_REQUEST_BODY: &str = "Adds a workflow that approves Dependabot pull requests \
    and enables auto-merge for patch and minor version updates.";

/// Errors raised when the pull request API cannot be reached or its answer cannot be read
#[derive(Debug, Error)]
#[error("failed to open pull request on {repository}: {reason}")]
pub struct PublicationError {
    pub repository: String,
    pub reason: String,
}

/// An open pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestHandle {
    pub number: u64,
    pub url: String,
}

/// Answer of the platform to a pull request creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestOutcome {
    /// The pull request was created.
    Opened(PullRequestHandle),
    /// The platform refused to create it (non-success status).
    Rejected { status: u16, reason: String },
}

/// Payload of a pull request creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
    pub assignees: Vec<String>,
}

impl PullRequestRequest {
    /// Pull request from [`BRANCH_NAME`] into `base`, assigned to `assignee`.
    #[must_use]
    pub fn enable_auto_merge(base: &str, assignee: &str) -> Self {
        Self {
            title: PULL_REQUEST_TITLE.to_owned(),
            head: BRANCH_NAME.to_owned(),
            base: base.to_owned(),
            body: PULL_REQUEST_BODY.to_owned(),
            assignees: vec![assignee.to_owned()],
        }
    }
}

/// Outcome of a side effect whose failure never aborts a run.
///
/// Callers report it and move on; it has no conversion into an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort {
    Applied,
    Failed { reason: String },
}

impl BestEffort {
    /// Log the outcome of `action`.
    pub fn report(&self, action: &str) {
        match self {
            Self::Applied => info!("{action}: done"),
            Self::Failed { reason } => warn!("{action}: failed: {reason}"),
        }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Trait for the pull request side of a code hosting platform
pub trait PullRequestApi {
    /// Allow workflows of the repository to write and to approve pull requests.
    fn set_workflow_permissions(&self, repository: &RepositoryReference) -> BestEffort;

    /// Open a pull request.
    ///
    /// A refusal by the platform is an [`PullRequestOutcome::Rejected`], not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the answer cannot be read.
    fn open_pull_request(
        &self,
        repository: &RepositoryReference,
        request: &PullRequestRequest,
    ) -> Result<PullRequestOutcome, PublicationError>;

    /// Assign users to an open pull request.
    fn add_assignees(
        &self,
        repository: &RepositoryReference,
        number: u64,
        assignees: &[String],
    ) -> BestEffort;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_targets_fixed_branch() {
        let request = PullRequestRequest::enable_auto_merge("develop", "octocat");
        assert_eq!(request.head, "enable-dependabot-auto-merge");
        assert_eq!(request.base, "develop");
        assert_eq!(request.title, "enable dependabot auto-merge");
        assert_eq!(request.assignees, vec!["octocat".to_owned()]);
    }

    #[test]
    fn request_serializes_as_api_payload() {
        let request = PullRequestRequest::enable_auto_merge("main", "octocat");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["head"], "enable-dependabot-auto-merge");
        assert_eq!(json["base"], "main");
        assert_eq!(json["assignees"][0], "octocat");
    }

    #[test]
    fn best_effort_reports_state() {
        assert!(BestEffort::Applied.is_applied());
        assert!(
            !BestEffort::Failed {
                reason: "403 Forbidden".to_owned()
            }
            .is_applied()
        );
    }
}
