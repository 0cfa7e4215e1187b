pub mod git;
pub mod github;
pub mod repo;
pub mod workflow;
pub mod workspace;

pub use git::GitCli;
pub use github::{GithubClient, GithubError};
pub use repo::{RepoError, ensure_work_tree};
pub use workflow::WorkflowInstaller;
pub use workspace::{Workspace, WorkspaceError};
