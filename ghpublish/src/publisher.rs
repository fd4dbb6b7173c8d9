use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::artifacts::{collect_artifacts, file_names};
use crate::asset::{upload_assets, AssetFile};
use crate::cli::Args;
use crate::config::Config;
use crate::endpoints::Endpoints;
use crate::environment::{discover_material, process_vars};
use crate::error::PublishError;
use crate::git;
use crate::github::{GitHubClient, ReleaseTarget, RepoSlug};
use crate::release::{publish_release, ReleaseRecord};
use crate::tag::{publish_tag, TagRecord};
use crate::transport::{HttpTransport, Transport};
use crate::version::{resolve_version, SidecarFilter, Version};

/// Fully resolved inputs of one publish run.
#[derive(Debug, Clone)]
pub struct PublishPlan {
    pub target: ReleaseTarget,
    pub notes: String,
    pub artifacts: Vec<PathBuf>,
    pub sidecars: SidecarFilter,
    pub draft: bool,
}

/// What a successful run left on the remote.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub version: Version,
    pub tag: TagRecord,
    pub release: ReleaseRecord,
    pub uploaded: Vec<String>,
}

/// Resolve the version, tag the commit, create the release and upload
/// every artifact, stopping at the first failure.
pub async fn publish<T: Transport>(
    client: &GitHubClient<T>,
    plan: &PublishPlan,
) -> Result<PublishReport> {
    let names = file_names(&plan.artifacts);
    let version = resolve_version(plan.sidecars.candidates(names.iter().copied()))
        .context("Failed to resolve the release version from the artifact files")?;
    tracing::info!("Resolved version {}", version);

    let assets = plan
        .artifacts
        .iter()
        .map(|path| AssetFile::from_path(path.as_path()))
        .collect::<crate::error::Result<Vec<_>>>()?;

    let tag = publish_tag(client, &plan.target, &version, &plan.notes)
        .await
        .with_context(|| format!("Failed to publish tag {version}"))?;

    let release = publish_release(
        client,
        &plan.target,
        &tag.name,
        &plan.notes,
        plan.draft,
    )
    .await
    .with_context(|| format!("Failed to publish release for tag {}", tag.name))?;

    let uploaded = upload_assets(client, &release.upload_url, &assets)
        .await
        .with_context(|| format!("Failed to upload assets to release {}", release.name))?;

    Ok(PublishReport {
        version,
        tag,
        release,
        uploaded,
    })
}

pub struct Publisher {
    args: Args,
    config: Config,
}

impl Publisher {
    pub fn new(mut args: Args) -> Result<Self> {
        let config = Config::discover(&args.config).context("Failed to load configuration")?;

        // Merge configuration with args
        config.merge_with_args(&mut args);

        Ok(Self { args, config })
    }

    /// Resolve every input from arguments, pipeline variables and the local
    /// checkout. Nothing remote is touched.
    pub fn plan(&self) -> Result<PublishPlan> {
        let target = self.resolve_target(&process_vars(), Path::new("."))?;

        let stage = self.args.stage.as_deref().ok_or_else(|| {
            PublishError::Config(
                "Pipeline stage not set. Set PPL_Name or use --stage".to_string(),
            )
        })?;
        let artifacts = collect_artifacts(&self.args.artifacts, stage)?;

        Ok(PublishPlan {
            target,
            notes: self.args.notes.clone(),
            artifacts,
            sidecars: self.config.artifacts.sidecar_filter(),
            draft: self.args.draft,
        })
    }

    /// Pick the repository and commit to publish.
    ///
    /// Pipeline variables are only consulted when no repository was given,
    /// and a material's revision is only used together with its own
    /// repository. Anything still missing comes from the checkout.
    fn resolve_target(
        &self,
        vars: &BTreeMap<String, String>,
        checkout: &Path,
    ) -> Result<ReleaseTarget> {
        let (repo, material_revision) = match &self.args.repository {
            Some(reference) => (RepoSlug::from_remote_url(reference)?, None),
            None => match discover_material(vars)? {
                Some(material) => (material.repo, Some(material.revision)),
                None => {
                    let url = git::origin_url(checkout)?;
                    (RepoSlug::from_remote_url(&url)?, None)
                }
            },
        };

        let commit = match (&self.args.revision, material_revision) {
            (Some(revision), _) => revision.clone(),
            (None, Some(revision)) => revision,
            (None, None) => git::head_commit(checkout)?,
        };

        tracing::info!("Repository: {}", repo);
        tracing::info!("Revision: {}", commit);
        Ok(ReleaseTarget::new(repo, commit))
    }

    pub fn client(&self) -> Result<GitHubClient<HttpTransport>> {
        let token = self.args.token.as_deref().ok_or_else(|| {
            PublishError::Config(
                "GitHub token not found. Set GITHUB_RELEASE_TOKEN or use --token".to_string(),
            )
        })?;
        let transport = HttpTransport::new(token, self.config.api.timeout())?;
        let endpoints = Endpoints::new(&self.config.api.base_url)?;
        Ok(GitHubClient::new(
            transport,
            endpoints,
            self.config.tagger.clone(),
        ))
    }

    pub async fn run(&self) -> Result<PublishReport> {
        let client = self.client()?;
        let plan = self.plan()?;
        let report = publish(&client, &plan).await?;

        tracing::info!(
            "Published release {} (tag {}) with {} asset(s)",
            report.release.name,
            report.tag.name,
            report.uploaded.len()
        );
        Ok(report)
    }
}
