//! HTTP client for the memos v0 API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{multipart, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::MemosService;
use crate::credentials::Credentials;
use crate::error::RemoteError;
use crate::models::{ListMemosFilter, MemoCreateRequest, MemoRecord, Resource, Tag};

/// Per-request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const STATUS_PATH: &str = "api/status";
const MEMO_PATH: &str = "api/memo";
const RESOURCE_BLOB_PATH: &str = "api/resource/blob";
const TAG_PATH: &str = "api/tag";

/// Longest server text carried into an error message.
const ERROR_EXCERPT_CHARS: usize = 180;

/// HTTP session against one memos server.
#[derive(Debug, Clone)]
pub struct MemosClient {
    credentials: Credentials,
    client: reqwest::Client,
}

impl MemosClient {
    pub fn new(credentials: Credentials) -> Result<Self, RemoteError> {
        Self::with_timeout(credentials, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(credentials: Credentials, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteError::Transport)?;
        Ok(Self {
            credentials,
            client,
        })
    }

    pub const fn host(&self) -> &Url {
        &self.credentials.host
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RemoteError> {
        let url = self.credentials.host.join(path).map_err(|error| {
            RemoteError::InvalidRequest(format!("failed to build URL for {path}: {error}"))
        })?;

        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(access_token) = &self.credentials.access_token {
            request = request.bearer_auth(access_token);
        }
        if let Some(open_id) = &self.credentials.open_id {
            request = request.query(&[("openId", open_id)]);
        }
        Ok(request)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body = response.text().await?;
        parse_payload(&body)
    }
}

#[async_trait]
impl MemosService for MemosClient {
    async fn check_status(&self) -> Result<(), RemoteError> {
        let request = self.request(Method::GET, STATUS_PATH)?;
        Self::send::<serde_json::Value>(request).await?;
        Ok(())
    }

    async fn create_memo(&self, request: &MemoCreateRequest) -> Result<MemoRecord, RemoteError> {
        let request = self.request(Method::POST, MEMO_PATH)?.json(request);
        Self::send(request).await
    }

    async fn upload_resource(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Resource, RemoteError> {
        let file_part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|error| {
                RemoteError::InvalidRequest(format!("invalid content type {content_type}: {error}"))
            })?;
        let form = multipart::Form::new().part("file", file_part);

        let request = self
            .request(Method::POST, RESOURCE_BLOB_PATH)?
            .multipart(form);
        Self::send(request).await
    }

    async fn upsert_tag(&self, name: &str) -> Result<Tag, RemoteError> {
        let request = self
            .request(Method::POST, TAG_PATH)?
            .json(&serde_json::json!({ "name": name }));
        Self::send(request).await
    }

    async fn list_memos(&self, filter: &ListMemosFilter) -> Result<Vec<MemoRecord>, RemoteError> {
        let request = self
            .request(Method::GET, MEMO_PATH)?
            .query(&filter.query_pairs());
        Self::send(request).await
    }
}

/// Responses arrive either wrapped as `{"data": ...}` or bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

fn parse_payload<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    let envelope = serde_json::from_str::<Envelope<T>>(body).map_err(|error| {
        RemoteError::Decode(format!("{error}; body: {}", excerpt(body)))
    })?;
    Ok(match envelope {
        Envelope::Wrapped { data } => data,
        Envelope::Bare(value) => value,
    })
}

fn status_error(status: StatusCode, body: &str) -> RemoteError {
    let message = error_message(body);
    let status = status.as_u16();
    if status == StatusCode::UNAUTHORIZED.as_u16() || status == StatusCode::FORBIDDEN.as_u16() {
        RemoteError::Unauthorized { status, message }
    } else {
        RemoteError::Api { status, message }
    }
}

/// Prefer the server's `message`/`error` field over the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|field| field.as_str()))
                .map(excerpt)
        })
        .unwrap_or_else(|| excerpt(body))
}

fn excerpt(text: &str) -> String {
    text.trim().chars().take(ERROR_EXCERPT_CHARS).collect()
}
