use thiserror::Error;

use crate::config::Settings;
use crate::infrastructure::{GitCli, GithubClient, GithubError};

use super::enable::{EnableError, RunOutcome};

/// Errors that can occur during command orchestration
#[derive(Debug, Error)]
pub enum AppError {
    /// The GitHub client could not be initialized.
    #[error(transparent)]
    Github(#[from] GithubError),

    /// The enable run failed.
    #[error(transparent)]
    Enable(#[from] EnableError),
}

/// Run the enable command against the real `git` executable and GitHub API.
///
/// # Errors
///
/// Returns [`AppError::Github`] if the HTTP client cannot be created.
/// Returns [`AppError::Enable`] if the run fails.
pub fn enable(repo_url: &str, settings: &Settings) -> Result<RunOutcome, AppError> {
    let client = GithubClient::new(&settings.github_token, &settings.api_base)?;
    Ok(super::enable::run(repo_url, settings, &GitCli, &client)?)
}
