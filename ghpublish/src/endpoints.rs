//! URL construction for every REST endpoint the publish workflow touches.

use crate::error::{PublishError, Result};
use crate::github::RepoSlug;
use reqwest::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repository-scoped endpoints under an API base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| PublishError::Config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(PublishError::Config(format!(
                "API base URL '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self { base })
    }

    /// `POST /repos/{owner}/{repo}/git/tags`
    pub fn git_tags(&self, repo: &RepoSlug) -> Url {
        self.repo_url(repo, &["git", "tags"])
    }

    /// `POST /repos/{owner}/{repo}/git/refs`
    pub fn git_refs(&self, repo: &RepoSlug) -> Url {
        self.repo_url(repo, &["git", "refs"])
    }

    /// `PATCH /repos/{owner}/{repo}/git/refs/tags/{tag}`
    pub fn git_tag_ref(&self, repo: &RepoSlug, tag: &str) -> Url {
        self.repo_url(repo, &["git", "refs", "tags", tag])
    }

    /// `POST /repos/{owner}/{repo}/releases`
    pub fn releases(&self, repo: &RepoSlug) -> Url {
        self.repo_url(repo, &["releases"])
    }

    fn repo_url(&self, repo: &RepoSlug, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
                .extend(tail);
        }
        url
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
        }
    }
}

/// Turn an upload URL template into the concrete URL for one asset.
///
/// The template looks like
/// `https://uploads.github.com/repos/octocat/Hello-World/releases/1/assets{?name,label}`;
/// everything from the first `{` is dropped and the query is rebuilt.
pub fn upload_url(template: &str, name: &str, label: Option<&str>) -> Result<Url> {
    let base = template
        .split_once('{')
        .map_or(template, |(base, _)| base);

    let mut url = Url::parse(base).map_err(|e| PublishError::UnexpectedResponse {
        operation: "release creation",
        reason: format!("invalid upload URL template '{template}': {e}"),
    })?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("name", name);
        if let Some(label) = label {
            query.append_pair("label", label);
        }
    }

    Ok(url)
}
