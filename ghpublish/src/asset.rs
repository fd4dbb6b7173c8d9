use crate::endpoints::upload_url;
use crate::error::{PublishError, Result};
use crate::github::GitHubClient;
use crate::transport::{ApiRequest, Transport};
use std::path::{Path, PathBuf};

/// A file to attach to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    pub path: PathBuf,
    pub name: String,
    pub label: Option<String>,
}

impl AssetFile {
    /// Asset named after the file's basename.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PublishError::Config(format!("Invalid asset path: {}", path.display()))
            })?
            .to_string();
        Ok(Self {
            path,
            name,
            label: None,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Upload one file to the release behind `upload_template`.
pub async fn upload_asset<T: Transport>(
    client: &GitHubClient<T>,
    upload_template: &str,
    asset: &AssetFile,
) -> Result<()> {
    let url = upload_url(upload_template, &asset.name, asset.label.as_deref())?;
    tracing::info!("Uploading asset: {}", asset.name);
    tracing::debug!("POST {}", url);

    let file_content = tokio::fs::read(&asset.path).await?;

    let response = client.send(ApiRequest::binary(url, file_content)).await?;
    if !response.status.is_success() {
        return Err(PublishError::RemoteRejected {
            operation: "Asset upload",
            status: response.status.as_u16(),
            body: response.body,
        });
    }

    tracing::info!("Successfully uploaded: {}", asset.name);
    Ok(())
}

/// Upload `assets` in order, stopping at the first failure.
///
/// Already uploaded assets stay on the release.
pub async fn upload_assets<T: Transport>(
    client: &GitHubClient<T>,
    upload_template: &str,
    assets: &[AssetFile],
) -> Result<Vec<String>> {
    let mut uploaded = Vec::with_capacity(assets.len());
    for asset in assets {
        upload_asset(client, upload_template, asset).await?;
        uploaded.push(asset.name.clone());
    }
    Ok(uploaded)
}
