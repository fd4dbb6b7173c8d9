//! Discovery of the repository and revision from pipeline variables.
//!
//! The pipeline exposes one `GO_MATERIAL_URL<suffix>` per source material and
//! a matching `GO_REVISION<suffix>` holding the built commit.

use crate::error::{PublishError, Result};
use crate::github::RepoSlug;
use std::collections::BTreeMap;

pub const MATERIAL_URL_PREFIX: &str = "GO_MATERIAL_URL";
pub const REVISION_PREFIX: &str = "GO_REVISION";

/// The single source material the pipeline built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineMaterial {
    pub repo: RepoSlug,
    pub revision: String,
}

/// Find the pipeline material in `vars`.
///
/// Returns `Ok(None)` when the pipeline exposes no material at all, and an
/// error when it exposes more than one or the revision is missing.
pub fn discover_material(vars: &BTreeMap<String, String>) -> Result<Option<PipelineMaterial>> {
    let materials: Vec<(&String, &String)> = vars
        .iter()
        .filter(|(key, _)| key.starts_with(MATERIAL_URL_PREFIX))
        .collect();

    let (key, url) = match materials.as_slice() {
        [] => return Ok(None),
        [single] => *single,
        many => {
            let found = many
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(PublishError::Config(format!(
                "A unique material URL was not found - found {found}"
            )));
        }
    };

    let suffix = &key[MATERIAL_URL_PREFIX.len()..];
    let revision_key = format!("{REVISION_PREFIX}{suffix}");
    let revision = vars
        .get(&revision_key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            PublishError::Config(format!("{key} is set but {revision_key} is missing"))
        })?;

    let repo = RepoSlug::from_remote_url(url)?;
    tracing::info!("Pipeline material {}: {} at {}", key, repo, revision);

    Ok(Some(PipelineMaterial {
        repo,
        revision: revision.trim().to_string(),
    }))
}

/// Snapshot of the process environment.
pub fn process_vars() -> BTreeMap<String, String> {
    std::env::vars().collect()
}
