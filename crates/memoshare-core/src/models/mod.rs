//! Data models for memoshare

mod memo;
mod resource;
mod tag;

pub use memo::{ListMemosFilter, MemoCreateRequest, MemoId, MemoRecord, RowStatus, Visibility};
pub use resource::{Resource, ResourceId};
pub use tag::Tag;
