use log::{info, warn};
use std::slice;
use thiserror::Error;

use crate::config::Settings;
use crate::domain::{
    BRANCH_NAME, COMMIT_MESSAGE, GitError, InstallOutcome, PublicationError, PullRequestApi,
    PullRequestHandle, PullRequestOutcome, PullRequestRequest, RepositoryReference,
    RepositoryUrlError, VersionControl, WorkflowError, WorkflowTemplate,
};
use crate::infrastructure::{WorkflowInstaller, Workspace, WorkspaceError};

/// Errors that abort an enable run
#[derive(Debug, Error)]
pub enum EnableError {
    #[error(transparent)]
    Url(#[from] RepositoryUrlError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Publication(#[from] PublicationError),
}

/// How an enable run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The repository already carries an equivalent workflow; nothing was published.
    AlreadyEnabled,
    /// A pull request was opened.
    Opened(PullRequestHandle),
    /// The branch was pushed but the platform refused the pull request.
    PullRequestRejected { status: u16, reason: String },
}

/// Install the Dependabot auto-merge workflow in `repo_url` through a pull request.
///
/// Steps, in order: resolve the URL, clone into a temporary workspace, raise the
/// workflow permissions (best effort), install the workflow, push it on
/// [`BRANCH_NAME`], open the pull request and assign the acting user (best
/// effort). The run stops early when the workflow is already present or the
/// pull request is refused. The workspace is removed on every exit path.
///
/// # Errors
///
/// Returns [`EnableError::Url`] if the URL has no owner and name.
/// Returns [`EnableError::Workspace`] if the temporary directory cannot be created.
/// Returns [`EnableError::Git`] if cloning, committing or pushing fails.
/// Returns [`EnableError::Workflow`] if the workflow file cannot be read or written.
/// Returns [`EnableError::Publication`] if the pull request API cannot be reached.
pub fn run<V, A>(
    repo_url: &str,
    settings: &Settings,
    vcs: &V,
    api: &A,
) -> Result<RunOutcome, EnableError>
where
    V: VersionControl,
    A: PullRequestApi,
{
    let repository = RepositoryReference::parse(repo_url)?;
    let workspace = Workspace::acquire()?;
    let work_tree = workspace.checkout();

    info!("Cloning {repository}...");
    vcs.clone_repository(repo_url, work_tree)?;

    api.set_workflow_permissions(&repository)
        .report("Update GitHub Actions workflow permissions");

    let template = WorkflowTemplate::dependabot_auto_merge();
    match WorkflowInstaller::new(work_tree).install(&template)? {
        InstallOutcome::AlreadyPresent => {
            info!("Auto-merge is already enabled on {repository}. Exiting...");
            return Ok(RunOutcome::AlreadyEnabled);
        }
        InstallOutcome::Installed => info!("Added {}", template.file_name()),
        InstallOutcome::Updated => info!("Replaced outdated {}", template.file_name()),
    }

    let base = vcs.default_branch(work_tree)?;
    info!("Pushing {BRANCH_NAME}...");
    vcs.publish_branch(work_tree, BRANCH_NAME, COMMIT_MESSAGE, &settings.author)?;

    let request = PullRequestRequest::enable_auto_merge(&base, &settings.username);
    let handle = match api.open_pull_request(&repository, &request)? {
        PullRequestOutcome::Opened(handle) => handle,
        PullRequestOutcome::Rejected { status, reason } => {
            warn!("Failed to create pull request: {reason}");
            return Ok(RunOutcome::PullRequestRejected { status, reason });
        }
    };
    info!("Pull request created successfully: {}", handle.url);

    api.add_assignees(
        &repository,
        handle.number,
        slice::from_ref(&settings.username),
    )
    .report("Assign pull request");

    Ok(RunOutcome::Opened(handle))
}
