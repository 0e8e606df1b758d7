use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] memoshare_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Nothing to share: pass text, pipe it on stdin, or attach a file or URL")]
    EmptyContent,
    #[error("Attachment not found: {0}")]
    AttachmentNotFound(String),
    #[error("Invalid attachment '{0}': {1}")]
    InvalidAttachment(String, String),
    #[error("Share failed: {0}")]
    ShareFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
