use std::env;
use std::fmt;
use thiserror::Error;

use crate::domain::CommitAuthor;

/// API base used when `GITHUB_API_URL` is not set
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
const GITHUB_USERNAME: &str = "GITHUB_USERNAME";
const COMMIT_USER: &str = "COMMIT_USER";
const COMMIT_EMAIL: &str = "COMMIT_EMAIL";
const GITHUB_API_URL: &str = "GITHUB_API_URL";

/// Errors that can occur when loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "missing required environment variable(s): {}\n\
         Set them in the environment or in a .env file.\n\
         Create a token at: https://github.com/settings/tokens",
        .0.join(", ")
    )]
    MissingVariables(Vec<&'static str>),
}

/// Runtime settings, loaded once at startup and passed to every component.
#[derive(Clone)]
pub struct Settings {
    /// GitHub API token for authenticated requests
    pub github_token: String,
    /// Acting GitHub user, assigned to the pull request
    pub username: String,
    /// Identity used for the commit
    pub author: CommitAuthor,
    /// Base URL of the REST API
    pub api_base: String,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariables`] naming every required variable
    /// that is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariables`] naming every required variable
    /// that is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            present(name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };

        let github_token = required(GITHUB_TOKEN);
        let username = required(GITHUB_USERNAME);
        let author_name = required(COMMIT_USER);
        let author_email = required(COMMIT_EMAIL);

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        Ok(Self {
            github_token,
            username,
            author: CommitAuthor {
                name: author_name,
                email: author_email,
            },
            api_base: present(GITHUB_API_URL).unwrap_or_else(|| DEFAULT_API_BASE.to_owned()),
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("github_token", &"<redacted>")
            .field("username", &self.username)
            .field("author", &self.author)
            .field("api_base", &self.api_base)
            .finish()
    }
}
