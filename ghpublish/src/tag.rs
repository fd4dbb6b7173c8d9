//! Annotated tag creation and the `refs/tags/<version>` reference behind it.

use crate::error::{PublishError, Result};
use crate::github::{response_field, GitHubClient, ReleaseTarget, Tagger};
use crate::transport::{ApiRequest, Transport};
use crate::version::Version;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TaggerPayload<'a> {
    name: &'a str,
    email: &'a str,
    date: String,
}

#[derive(Debug, Serialize)]
struct TagObjectPayload<'a> {
    tag: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    tagger: TaggerPayload<'a>,
}

#[derive(Debug, Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateRefPayload<'a> {
    sha: &'a str,
    force: bool,
}

/// How the tag reference ended up pointing at the new tag object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefOutcome {
    Created,
    Updated,
}

/// The annotated tag as published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub name: String,
    pub description: String,
    pub commit: String,
    pub object_sha: String,
    pub reference: RefOutcome,
}

/// Tagger timestamp: UTC, whole seconds, trailing `Z`.
pub fn tagger_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn tag_object_payload(
    tag: &str,
    description: &str,
    commit: &str,
    tagger: &Tagger,
    now: DateTime<Utc>,
) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(TagObjectPayload {
        tag,
        message: description,
        object: commit,
        kind: "commit",
        tagger: TaggerPayload {
            name: &tagger.name,
            email: &tagger.email,
            date: tagger_date(now),
        },
    })
}

/// Create an annotated tag for `version` on the target commit and point
/// `refs/tags/<version>` at it.
///
/// An existing reference is force-moved to the new tag object, so the last
/// publish of a version wins. Each call leaves a fresh tag object behind.
pub async fn publish_tag<T: Transport>(
    client: &GitHubClient<T>,
    target: &ReleaseTarget,
    version: &Version,
    description: &str,
) -> Result<TagRecord> {
    let tag_name = version.to_string();
    let endpoints = client.endpoints();

    let payload = tag_object_payload(
        &tag_name,
        description,
        &target.commit,
        client.tagger(),
        Utc::now(),
    )?;
    let url = endpoints.git_tags(&target.repo);
    tracing::info!("Creating tag object {} for commit {}", tag_name, target.commit);
    tracing::debug!("POST {} {}", url, payload);

    let response = client
        .send(ApiRequest::json(Method::POST, url, payload))
        .await?;
    if !response.status.is_success() {
        return Err(PublishError::CreateTagObjectFailed {
            status: response.status.as_u16(),
            body: response.body,
        });
    }
    let object_sha = response_field(&response, "tag object creation", "sha")?;
    tracing::debug!("Tag object {} created as {}", tag_name, object_sha);

    let create_payload = serde_json::to_value(CreateRefPayload {
        reference: format!("refs/tags/{tag_name}"),
        sha: &object_sha,
    })?;
    let response = client
        .send(ApiRequest::json(
            Method::POST,
            endpoints.git_refs(&target.repo),
            create_payload,
        ))
        .await?;

    let reference = if response.status.is_success() {
        RefOutcome::Created
    } else if response.status.is_client_error() {
        tracing::warn!(
            "git tag {} already exists (HTTP {}), updating the reference",
            tag_name,
            response.status.as_u16()
        );
        let update_payload = serde_json::to_value(UpdateRefPayload {
            sha: &object_sha,
            force: true,
        })?;
        let response = client
            .send(ApiRequest::json(
                Method::PATCH,
                endpoints.git_tag_ref(&target.repo, &tag_name),
                update_payload,
            ))
            .await?;
        if !response.status.is_success() {
            return Err(PublishError::RemoteRejected {
                operation: "Tag reference update",
                status: response.status.as_u16(),
                body: response.body,
            });
        }
        RefOutcome::Updated
    } else {
        return Err(PublishError::RemoteRejected {
            operation: "Tag reference creation",
            status: response.status.as_u16(),
            body: response.body,
        });
    };

    tracing::info!("Added tag \"{}\" with description: \"{}\"", tag_name, description);

    Ok(TagRecord {
        name: tag_name,
        description: description.to_string(),
        commit: target.commit.clone(),
        object_sha,
        reference,
    })
}
