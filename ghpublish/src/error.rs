use crate::version::Version;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Expected exactly one version in the artifact set, found {}: [{}]", .found.len(), format_versions(.found))]
    VersionAmbiguity { found: Vec<Version> },

    #[error("Malformed version '{input}'. Expected format: MAJOR.MINOR.PATCH.BUILD (e.g., 1.2.3.4)")]
    MalformedVersion { input: String },

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to create tag object: HTTP {status} - {body}")]
    CreateTagObjectFailed { status: u16, body: String },

    #[error("Release for tag {tag} already exists: {body}")]
    TagAlreadyReleased { tag: String, body: String },

    #[error("{operation} rejected: HTTP {status} - {body}")]
    RemoteRejected {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {operation}: {reason}")]
    UnexpectedResponse {
        operation: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, PublishError>;

fn format_versions(found: &[Version]) -> String {
    found
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
