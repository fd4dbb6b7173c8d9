//! The request/response contract between the publishers and the remote API.

use crate::error::{PublishError, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use std::future::Future;
use std::time::Duration;

pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Binary {
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn json(method: Method, url: Url, payload: serde_json::Value) -> Self {
        Self {
            method,
            url,
            body: RequestBody::Json(payload),
        }
    }

    pub fn binary(url: Url, bytes: Vec<u8>) -> Self {
        Self {
            method: Method::POST,
            url,
            body: RequestBody::Binary {
                content_type: OCTET_STREAM,
                bytes,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one request and hands back the raw status and body.
///
/// Implementations only fail for transport-level problems (connection,
/// timeout); any HTTP status is a successful `ApiResponse`.
pub trait Transport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// reqwest-backed transport carrying the credential on every request.
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    pub fn new(token: &str, timeout: Duration) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            PublishError::Config("GitHub token contains characters not allowed in a header".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let http_client = Client::builder()
            .user_agent(concat!("ghpublish/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http_client })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        tracing::debug!("{} {}", request.method, request.url);

        let builder = self.http_client.request(request.method, request.url);
        let builder = match request.body {
            RequestBody::Json(payload) => builder.json(&payload),
            RequestBody::Binary {
                content_type,
                bytes,
            } => builder.header(header::CONTENT_TYPE, content_type).body(bytes),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_request_uses_octet_stream() {
        let url = Url::parse("https://uploads.example.com/assets?name=a.bin").unwrap();
        let request = ApiRequest::binary(url, b"payload".to_vec());
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.body,
            RequestBody::Binary {
                content_type: OCTET_STREAM,
                bytes: b"payload".to_vec(),
            }
        );
    }

    #[test]
    fn test_http_transport_rejects_bad_token() {
        assert!(HttpTransport::new("bad\ntoken", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new("ghp_example", Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let transport = HttpTransport::new("ghp_example", Duration::from_secs(2)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/repos/o/r/releases").unwrap();

        let err = transport
            .send(ApiRequest::json(Method::POST, url, serde_json::json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Transport(_)));
    }

    #[tokio::test]
    async fn test_truncated_body_is_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Drain the whole request (its JSON body is `{}`) before answering.
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.ends_with(b"{}") {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
            }
            socket
                .write_all(b"HTTP/1.1 201 Created\r\nContent-Length: 100\r\n\r\n{\"sha\"")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let transport = HttpTransport::new("ghp_example", Duration::from_secs(2)).unwrap();
        let url = Url::parse(&format!("http://{addr}/repos/o/r/git/tags")).unwrap();
        let err = transport
            .send(ApiRequest::json(Method::POST, url, serde_json::json!({})))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Transport(_)));
        server.await.unwrap();
    }
}
