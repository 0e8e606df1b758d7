//! Remote memos service contract.
//!
//! The pipeline only talks to [`MemosService`]; [`MemosClient`] is the HTTP
//! implementation used outside of tests.

mod http;

use std::time::Duration;

use async_trait::async_trait;

pub use http::{MemosClient, DEFAULT_TIMEOUT};

use crate::credentials::Credentials;
use crate::error::RemoteError;
use crate::models::{ListMemosFilter, MemoCreateRequest, MemoRecord, Resource, Tag};

/// Operations the share pipeline and usage refresher need from a server.
///
/// Every call is a single network round trip bounded by the client timeout.
/// Nothing is retried.
#[async_trait]
pub trait MemosService: Send + Sync {
    /// Lightweight identity/status check.
    async fn check_status(&self) -> Result<(), RemoteError>;

    async fn create_memo(&self, request: &MemoCreateRequest) -> Result<MemoRecord, RemoteError>;

    async fn upload_resource(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Resource, RemoteError>;

    /// Idempotently create a tag.
    async fn upsert_tag(&self, name: &str) -> Result<Tag, RemoteError>;

    async fn list_memos(&self, filter: &ListMemosFilter) -> Result<Vec<MemoRecord>, RemoteError>;
}

/// Builds a service session from resolved credentials.
pub trait MemosConnector: Send + Sync {
    type Service: MemosService;

    fn connect(&self, credentials: &Credentials) -> Result<Self::Service, RemoteError>;
}

/// Connector producing [`MemosClient`] sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConnector {
    timeout: Duration,
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpConnector {
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl MemosConnector for HttpConnector {
    type Service = MemosClient;

    fn connect(&self, credentials: &Credentials) -> Result<Self::Service, RemoteError> {
        MemosClient::with_timeout(credentials.clone(), self.timeout)
    }
}
