//! memoshare-core - Core library for memoshare
//!
//! This crate contains the share ingestion pipeline, the memos HTTP client,
//! the shared credential store, and the usage heatmap aggregation used by
//! every memoshare surface.

pub mod attachments;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ingest;
pub mod models;
pub mod secret_store;
pub mod tags;
pub mod usage;

pub use error::{Error, ErrorKind, RemoteError, Result};
pub use ingest::{Ingestor, ShareInput, ShareStatus};
pub use models::{MemoId, MemoRecord};
