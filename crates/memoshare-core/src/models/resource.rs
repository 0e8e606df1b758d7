//! Uploaded resource model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned resource identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub i64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file stored on the memos server, linkable into a memo by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    #[serde(default)]
    pub filename: String,
    /// Content MIME type
    #[serde(default, rename = "type")]
    pub mime_type: String,
    /// Size in bytes
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default)]
    pub created_ts: i64,
}
