//! In-memory transports standing in for the GitHub API.

#![allow(dead_code)]

use ghpublish::endpoints::Endpoints;
use ghpublish::error::Result;
use ghpublish::github::{GitHubClient, ReleaseTarget, RepoSlug, Tagger};
use ghpublish::transport::{ApiRequest, ApiResponse, RequestBody, Transport};
use reqwest::{Method, StatusCode};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::future::Future;
use std::sync::Mutex;

pub const UPLOAD_TEMPLATE: &str =
    "https://uploads.github.com/repos/oist/library/releases/1/assets{?name,label}";

pub fn target(commit: &str) -> ReleaseTarget {
    ReleaseTarget::new(RepoSlug::new("oist", "library"), commit)
}

pub fn client<T: Transport>(transport: T) -> GitHubClient<T> {
    GitHubClient::new(transport, Endpoints::default(), Tagger::default())
}

pub fn json_body(request: &ApiRequest) -> serde_json::Value {
    match &request.body {
        RequestBody::Json(value) => value.clone(),
        other => panic!("expected a JSON body, got {other:?}"),
    }
}

/// Replays canned responses in order and records every request.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new<'a>(responses: impl IntoIterator<Item = (u16, &'a str)>) -> Self {
        let responses = responses
            .into_iter()
            .map(|(status, body)| {
                ApiResponse::new(StatusCode::from_u16(status).unwrap(), body)
            })
            .collect();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send {
        self.requests.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "no scripted response")
            });
        async move { Ok(response) }
    }
}

#[derive(Default)]
struct RemoteState {
    /// tag object sha -> commit it annotates
    tag_objects: BTreeMap<String, String>,
    /// ref name -> tag object sha
    refs: BTreeMap<String, String>,
    releases: BTreeSet<String>,
    uploads: Vec<(String, Option<String>, Vec<u8>)>,
    requests: Vec<(Method, String)>,
}

/// A stateful imitation of the git data and releases endpoints.
#[derive(Default)]
pub struct FakeGitHub {
    state: Mutex<RemoteState>,
    failing_uploads: BTreeSet<String>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject uploads of the asset called `name` with a 500.
    pub fn failing_upload(mut self, name: &str) -> Self {
        self.failing_uploads.insert(name.to_string());
        self
    }

    /// Commit that `refs/tags/<tag>` ultimately points at.
    pub fn tagged_commit(&self, tag: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        let object = state.refs.get(&format!("refs/tags/{tag}"))?;
        state.tag_objects.get(object).cloned()
    }

    pub fn tag_object_count(&self) -> usize {
        self.state.lock().unwrap().tag_objects.len()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.uploads.iter().map(|(name, _, _)| name.clone()).collect()
    }

    pub fn uploads(&self) -> Vec<(String, Option<String>, Vec<u8>)> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn request_log(&self) -> Vec<(Method, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    fn handle(&self, request: ApiRequest) -> ApiResponse {
        let mut state = self.state.lock().unwrap();
        let path = request.url.path().to_string();
        state.requests.push((request.method.clone(), path.clone()));

        if request.url.host_str() == Some("uploads.github.com") {
            let query: BTreeMap<String, String> = request.url.query_pairs().into_owned().collect();
            let Some(name) = query.get("name").cloned() else {
                return ApiResponse::new(StatusCode::BAD_REQUEST, "missing name");
            };
            if self.failing_uploads.contains(&name) {
                return ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "upload failed");
            }
            let RequestBody::Binary { bytes, .. } = request.body else {
                return ApiResponse::new(StatusCode::BAD_REQUEST, "expected binary body");
            };
            state.uploads.push((name, query.get("label").cloned(), bytes));
            return ApiResponse::new(StatusCode::CREATED, "{}");
        }

        let body = match &request.body {
            RequestBody::Json(value) => value.clone(),
            RequestBody::Binary { .. } => serde_json::Value::Null,
        };
        let field = |name: &str| body[name].as_str().unwrap_or_default().to_string();

        match (request.method, path.as_str()) {
            (Method::POST, "/repos/oist/library/git/tags") => {
                let sha = format!("tagobject{}", state.tag_objects.len() + 1);
                state.tag_objects.insert(sha.clone(), field("object"));
                ApiResponse::new(StatusCode::CREATED, serde_json::json!({ "sha": sha }).to_string())
            }
            (Method::POST, "/repos/oist/library/git/refs") => {
                let reference = field("ref");
                if state.refs.contains_key(&reference) {
                    return ApiResponse::new(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        r#"{"message":"Reference already exists"}"#,
                    );
                }
                state.refs.insert(reference, field("sha"));
                ApiResponse::new(StatusCode::CREATED, "{}")
            }
            (Method::PATCH, p) if p.starts_with("/repos/oist/library/git/refs/tags/") => {
                let reference = p.trim_start_matches("/repos/oist/library/git/").to_string();
                if !state.refs.contains_key(&reference) || body["force"] != serde_json::json!(true) {
                    return ApiResponse::new(StatusCode::UNPROCESSABLE_ENTITY, "{}");
                }
                state.refs.insert(reference, field("sha"));
                ApiResponse::new(StatusCode::OK, "{}")
            }
            (Method::POST, "/repos/oist/library/releases") => {
                let tag = field("tag_name");
                if !state.releases.insert(tag) {
                    return ApiResponse::new(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        r#"{"message":"Validation Failed","errors":[{"code":"already_exists"}]}"#,
                    );
                }
                ApiResponse::new(
                    StatusCode::CREATED,
                    serde_json::json!({ "id": 1, "upload_url": UPLOAD_TEMPLATE }).to_string(),
                )
            }
            _ => ApiResponse::new(StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#),
        }
    }
}

impl Transport for FakeGitHub {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send {
        let response = self.handle(request);
        async move { Ok(response) }
    }
}
