use reqwest::Url;
use std::fmt;
use thiserror::Error;

/// Errors that can occur when resolving a repository URL
#[derive(Debug, Error)]
pub enum RepositoryUrlError {
    #[error(
        "malformed repository URL: {url}\n\
         Expected a URL with an owner and a repository name, e.g. https://github.com/owner/repo"
    )]
    Malformed { url: String },
}

/// A GitHub repository identified by its owner and name.
///
/// Both parts are non-empty and the name never carries a `.git` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

impl RepositoryReference {
    /// Resolve a repository URL into its owner and name.
    ///
    /// Accepts absolute URLs (`https://github.com/owner/repo.git`) and scp-like
    /// addresses (`git@github.com:owner/repo.git`). Only the first two path
    /// segments are used, so links such as `https://github.com/owner/repo/tree/main`
    /// resolve to `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryUrlError::Malformed`] if the path holds fewer than two
    /// segments or the repository name is empty once `.git` is stripped.
    pub fn parse(url: &str) -> Result<Self, RepositoryUrlError> {
        let malformed = || RepositoryUrlError::Malformed {
            url: url.to_owned(),
        };

        let path = url_path(url).ok_or_else(malformed)?;
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());

        let owner = segments.next().ok_or_else(malformed)?;
        let raw_name = segments.next().ok_or_else(malformed)?;
        let name = raw_name.strip_suffix(".git").unwrap_or(raw_name);

        if name.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// REST endpoint of this repository below the given API base,
    /// e.g. `https://api.github.com/repos/owner/repo`.
    #[must_use]
    pub fn api_url(&self, api_base: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            api_base.trim_end_matches('/'),
            self.owner,
            self.name
        )
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extract the path of an absolute URL or of an scp-like `user@host:path` address.
fn url_path(url: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(url)
        && parsed.has_host()
    {
        return Some(parsed.path().to_owned());
    }

    let (host, path) = url.split_once(':')?;
    if host.is_empty() || host.contains('/') {
        return None;
    }
    Some(path.to_owned())
}
