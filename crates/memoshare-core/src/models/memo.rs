//! Memo model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::resource::{Resource, ResourceId};
use crate::{Error, Result};

/// Server-assigned memo identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoId(pub i64);

impl fmt::Display for MemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who can read a memo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Private,
}

/// Archive state of a memo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    #[default]
    Normal,
    Archived,
}

impl RowStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl Visibility {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Protected => "PROTECTED",
            Self::Private => "PRIVATE",
        }
    }
}

/// A memo as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoRecord {
    pub id: MemoId,
    #[serde(default)]
    pub creator_id: Option<i64>,
    /// Creation timestamp (Unix seconds)
    pub created_ts: i64,
    /// Last update timestamp (Unix seconds)
    #[serde(default)]
    pub updated_ts: i64,
    #[serde(default)]
    pub row_status: RowStatus,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub pinned: bool,
    pub content: String,
    #[serde(default)]
    pub resource_list: Vec<Resource>,
}

/// Body of a create-memo call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoCreateRequest {
    pub content: String,
    /// `None` inherits the server's default visibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    pub resource_id_list: Vec<ResourceId>,
}

impl MemoCreateRequest {
    /// Build a request, rejecting one with neither content nor resources.
    pub fn new(content: impl Into<String>, resource_id_list: Vec<ResourceId>) -> Result<Self> {
        let content = content.into();
        if content.trim().is_empty() && resource_id_list.is_empty() {
            return Err(Error::EmptyContent);
        }
        Ok(Self {
            content,
            visibility: None,
            resource_id_list,
        })
    }
}

/// Query for the list-memos call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListMemosFilter {
    pub creator_id: Option<i64>,
    pub row_status: Option<RowStatus>,
    pub visibility: Option<Visibility>,
}

impl ListMemosFilter {
    /// Non-archived memos of every visibility.
    #[must_use]
    pub const fn normal() -> Self {
        Self {
            creator_id: None,
            row_status: Some(RowStatus::Normal),
            visibility: None,
        }
    }

    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(creator_id) = self.creator_id {
            pairs.push(("creatorId", creator_id.to_string()));
        }
        if let Some(row_status) = self.row_status {
            pairs.push(("rowStatus", row_status.as_str().to_string()));
        }
        if let Some(visibility) = self.visibility {
            pairs.push(("visibility", visibility.as_str().to_string()));
        }
        pairs
    }
}
