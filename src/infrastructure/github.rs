use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::{
    BestEffort, PublicationError, PullRequestApi, PullRequestHandle, PullRequestOutcome,
    PullRequestRequest, RepositoryReference,
};

const USER_AGENT: &str = "automerge-enabler";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Errors that can occur when interacting with the Github API
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("failed to create HTTP client")]
    ClientInit(#[source] reqwest::Error),

    #[error("failed to {operation} at {url}")]
    Request {
        operation: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Github API returned status {status} for {url}: {message}")]
    ApiStatus {
        status: StatusCode,
        url: String,
        message: String,
    },

    #[error("failed to parse response from {url}")]
    ParseResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Body of `PUT /repos/{owner}/{repo}/actions/permissions/workflow`
#[derive(Debug, Serialize)]
struct WorkflowPermissions {
    default_workflow_permissions: &'static str,
    can_approve_pull_request_reviews: bool,
}

/// Body of `POST /repos/{owner}/{repo}/issues/{number}/assignees`
#[derive(Debug, Serialize)]
struct Assignees<'a> {
    assignees: &'a [String],
}

/// Pull request returned by the Github API
#[derive(Debug, Deserialize)]
struct CreatedPullRequest {
    number: u64,
    html_url: String,
}

/// Error payload returned by the Github API
#[derive(Debug, Default, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

/// Single validation error inside an [`ApiMessage`]
#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl ApiMessage {
    /// Human readable reason, e.g. `Validation Failed: A pull request already exists`.
    fn describe(&self, status: StatusCode) -> String {
        let headline = self
            .message
            .clone()
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_owned());

        let details: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|detail| detail.message.as_deref())
            .collect();

        if details.is_empty() {
            headline
        } else {
            format!("{headline}: {}", details.join("; "))
        }
    }
}

/// Client for the Github REST endpoints used to publish the workflow
pub struct GithubClient {
    client: reqwest::blocking::Client,
    token: String,
    api_base: String,
}

impl GithubClient {
    /// Create a new Github client authenticating with `token` against `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::ClientInit`] if the HTTP client cannot be initialized.
    ///
    /// # Panics
    ///
    /// This method panics if called from within an async runtime. See docs on
    /// [`reqwest::blocking`] for details.
    pub fn new(token: &str, api_base: &str) -> Result<Self, GithubError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(GithubError::ClientInit)?;

        Ok(Self {
            client,
            token: token.to_owned(),
            api_base: api_base.to_owned(),
        })
    }

    /// Attach the headers every Github API call carries.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Send a prepared request, mapping transport failures.
    fn send(
        operation: &'static str,
        url: &str,
        builder: RequestBuilder,
    ) -> Result<Response, GithubError> {
        debug!("{operation}: {url}");
        builder.send().map_err(|source| GithubError::Request {
            operation,
            url: url.to_owned(),
            source,
        })
    }

    /// Allow the repository's workflows to write and to approve pull requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API does not answer `204 No Content`.
    pub fn update_workflow_permissions(
        &self,
        repository: &RepositoryReference,
    ) -> Result<(), GithubError> {
        let url = format!(
            "{}/actions/permissions/workflow",
            repository.api_url(&self.api_base)
        );
        let body = WorkflowPermissions {
            default_workflow_permissions: "write",
            can_approve_pull_request_reviews: true,
        };

        let response = Self::send(
            "update workflow permissions",
            &url,
            self.authorized(self.client.put(&url)).json(&body),
        )?;

        expect_status(response, StatusCode::NO_CONTENT, url)
    }

    /// Open a pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a created pull request cannot be parsed.
    /// A refusal by the API is returned as [`PullRequestOutcome::Rejected`].
    pub fn create_pull_request(
        &self,
        repository: &RepositoryReference,
        request: &PullRequestRequest,
    ) -> Result<PullRequestOutcome, GithubError> {
        let url = format!("{}/pulls", repository.api_url(&self.api_base));

        let response = Self::send(
            "create pull request",
            &url,
            self.authorized(self.client.post(&url)).json(request),
        )?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Ok(PullRequestOutcome::Rejected {
                status: status.as_u16(),
                reason: rejection_reason(response),
            });
        }

        let created: CreatedPullRequest =
            response
                .json()
                .map_err(|source| GithubError::ParseResponse {
                    url: url.clone(),
                    source,
                })?;

        Ok(PullRequestOutcome::Opened(PullRequestHandle {
            number: created.number,
            url: created.html_url,
        }))
    }

    /// Assign users to an issue or pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API does not answer `201 Created`.
    pub fn assign(
        &self,
        repository: &RepositoryReference,
        number: u64,
        assignees: &[String],
    ) -> Result<(), GithubError> {
        let url = format!(
            "{}/issues/{number}/assignees",
            repository.api_url(&self.api_base)
        );

        let response = Self::send(
            "add assignees",
            &url,
            self.authorized(self.client.post(&url))
                .json(&Assignees { assignees }),
        )?;

        expect_status(response, StatusCode::CREATED, url)
    }
}

/// Turn any status other than `expected` into [`GithubError::ApiStatus`].
fn expect_status(
    response: Response,
    expected: StatusCode,
    url: String,
) -> Result<(), GithubError> {
    let status = response.status();
    if status == expected {
        return Ok(());
    }
    Err(GithubError::ApiStatus {
        status,
        url,
        message: rejection_reason(response),
    })
}

/// Read the reason of a refused request from its body.
fn rejection_reason(response: Response) -> String {
    let status = response.status();
    response
        .json::<ApiMessage>()
        .unwrap_or_default()
        .describe(status)
}

impl PullRequestApi for GithubClient {
    fn set_workflow_permissions(&self, repository: &RepositoryReference) -> BestEffort {
        match self.update_workflow_permissions(repository) {
            Ok(()) => BestEffort::Applied,
            Err(err) => BestEffort::Failed {
                reason: err.to_string(),
            },
        }
    }

    fn open_pull_request(
        &self,
        repository: &RepositoryReference,
        request: &PullRequestRequest,
    ) -> Result<PullRequestOutcome, PublicationError> {
        self.create_pull_request(repository, request)
            .map_err(|err| PublicationError {
                repository: repository.to_string(),
                reason: err.to_string(),
            })
    }

    fn add_assignees(
        &self,
        repository: &RepositoryReference,
        number: u64,
        assignees: &[String],
    ) -> BestEffort {
        match self.assign(repository, number, assignees) {
            Ok(()) => BestEffort::Applied,
            Err(err) => BestEffort::Failed {
                reason: err.to_string(),
            },
        }
    }
}
