use crate::endpoints::Endpoints;
use crate::error::{PublishError, Result};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A repository in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a remote URL or a bare `owner/name`.
    ///
    /// Accepts `git@host:owner/name.git`, `https://host/owner/name`,
    /// `ssh://git@host/owner/name.git` and `owner/name`.
    pub fn from_remote_url(remote: &str) -> Result<Self> {
        let invalid = || {
            PublishError::Config(format!(
                "Could not derive owner/name from repository reference '{remote}'"
            ))
        };

        let trimmed = remote.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let path = if let Some((_, rest)) = trimmed.split_once("://") {
            // scheme://[user@]host[:port]/owner/name
            rest.split_once('/').map(|(_, path)| path).ok_or_else(invalid)?
        } else if let Some((host, path)) = trimmed.split_once(':') {
            // scp-like: [user@]host:owner/name
            if host.is_empty() {
                return Err(invalid());
            }
            path
        } else {
            trimmed
        };

        match path.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self::new(*owner, *name)),
            _ => Err(invalid()),
        }
    }
}

impl FromStr for RepoSlug {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_remote_url(s)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Where a release goes: the repository and the commit the tag points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub repo: RepoSlug,
    pub commit: String,
}

impl ReleaseTarget {
    pub fn new(repo: RepoSlug, commit: impl Into<String>) -> Self {
        Self {
            repo,
            commit: commit.into(),
        }
    }
}

/// Identity recorded as the tagger of annotated tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tagger {
    pub name: String,
    pub email: String,
}

impl Default for Tagger {
    fn default() -> Self {
        Self {
            name: "ghpublish-bot".to_string(),
            email: "ghpublish-bot@users.noreply.github.com".to_string(),
        }
    }
}

/// Everything the publishers need to talk to the remote: a transport
/// carrying the credential, the endpoint layout and the tagger identity.
pub struct GitHubClient<T> {
    transport: T,
    endpoints: Endpoints,
    tagger: Tagger,
}

impl<T: Transport> GitHubClient<T> {
    pub fn new(transport: T, endpoints: Endpoints, tagger: Tagger) -> Self {
        Self {
            transport,
            endpoints,
            tagger,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn tagger(&self) -> &Tagger {
        &self.tagger
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.transport.send(request).await
    }
}

/// Pull a string field out of a JSON response body.
pub(crate) fn response_field(
    response: &ApiResponse,
    operation: &'static str,
    field: &str,
) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(&response.body).map_err(|e| PublishError::UnexpectedResponse {
            operation,
            reason: format!("response body is not JSON: {e}"),
        })?;

    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| PublishError::UnexpectedResponse {
            operation,
            reason: format!("response has no '{field}' field"),
        })
}
