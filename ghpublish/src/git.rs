//! Fallbacks read from the local checkout when the pipeline supplies nothing.

use crate::error::{PublishError, Result};
use git2::Repository;
use std::path::Path;

fn open(path: &Path) -> Result<Repository> {
    Repository::discover(path).map_err(|e| {
        PublishError::Config(format!(
            "No git repository found at {}: {}",
            path.display(),
            e.message()
        ))
    })
}

/// Full hash of the commit `HEAD` resolves to.
pub fn head_commit(path: &Path) -> Result<String> {
    let repo = open(path)?;
    let commit = repo.head()?.peel_to_commit()?;
    Ok(commit.id().to_string())
}

/// URL of the `origin` remote.
pub fn origin_url(path: &Path) -> Result<String> {
    let repo = open(path)?;
    let remote = repo.find_remote("origin")?;
    remote
        .url()
        .map(str::to_string)
        .ok_or_else(|| PublishError::Config("Remote 'origin' has no valid URL".to_string()))
}
