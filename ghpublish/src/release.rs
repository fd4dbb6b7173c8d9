use crate::error::{PublishError, Result};
use crate::github::{response_field, GitHubClient, ReleaseTarget};
use crate::transport::{ApiRequest, Transport};
use crate::version::release_name;
use reqwest::{Method, StatusCode};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ReleasePayload<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    draft: bool,
}

/// A release created on the remote, with the template its assets upload to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub upload_url: String,
}

/// Create the release for `tag_name` and return it with its upload URL template.
///
/// The release name is the tag without its build component. A 422 from the
/// remote means the tag already has a release and is reported as
/// [`PublishError::TagAlreadyReleased`].
pub async fn publish_release<T: Transport>(
    client: &GitHubClient<T>,
    target: &ReleaseTarget,
    tag_name: &str,
    notes: &str,
    draft_only: bool,
) -> Result<ReleaseRecord> {
    let name = release_name(tag_name)?;

    let draft = if draft_only { "draft " } else { "" };
    tracing::info!(
        "Creating {}release \"{}\" with tag \"{}\"",
        draft,
        name,
        tag_name
    );

    let payload = serde_json::to_value(ReleasePayload {
        tag_name,
        name: &name,
        body: notes,
        draft: draft_only,
    })?;
    let url = client.endpoints().releases(&target.repo);
    tracing::debug!("POST {} {}", url, payload);

    let response = client
        .send(ApiRequest::json(Method::POST, url, payload))
        .await?;

    if response.status == StatusCode::UNPROCESSABLE_ENTITY {
        tracing::error!("Release for tag {} already exists", tag_name);
        return Err(PublishError::TagAlreadyReleased {
            tag: tag_name.to_string(),
            body: response.body,
        });
    }
    if !response.status.is_success() {
        return Err(PublishError::RemoteRejected {
            operation: "Release creation",
            status: response.status.as_u16(),
            body: response.body,
        });
    }

    let upload_url = response_field(&response, "release creation", "upload_url")?;
    tracing::info!("Created release {}", name);

    Ok(ReleaseRecord {
        tag_name: tag_name.to_string(),
        name,
        body: notes.to_string(),
        draft: draft_only,
        upload_url,
    })
}
