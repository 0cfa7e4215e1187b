pub mod publication;
pub mod repository;
pub mod vcs;
pub mod workflow;

pub use publication::{
    BRANCH_NAME, BestEffort, COMMIT_MESSAGE, PublicationError, PullRequestApi, PullRequestHandle,
    PullRequestOutcome, PullRequestRequest,
};
pub use repository::{RepositoryReference, RepositoryUrlError};
pub use vcs::{CommitAuthor, GitError, VersionControl};
pub use workflow::{
    InstallOutcome, WORKFLOW_FILE_NAME, WorkflowDocument, WorkflowError, WorkflowTemplate,
};
