//! Error types for memoshare-core

use thiserror::Error;

/// Result type alias using memoshare-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in memoshare-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// No usable memos host is configured
    #[error("Not signed in to a memos server: {0}")]
    NotAuthenticated(String),

    /// An image attachment could not be decoded or re-encoded
    #[error("Attachment #{index} is not a readable image: {reason}")]
    InvalidAttachment { index: usize, reason: String },

    /// Nothing left to submit after normalization
    #[error("Nothing to share: no text, links, or images")]
    EmptyContent,

    /// Uploading the attachment at `index` failed
    #[error("Failed to upload attachment #{index}: {source}")]
    ResourceUpload {
        index: usize,
        #[source]
        source: RemoteError,
    },

    /// Any other remote service failure
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The invoking surface abandoned the attempt
    #[error("Share was cancelled")]
    Cancelled,

    /// Invalid local configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Keyring access failed
    #[error("Secure storage error: {0}")]
    SecureStorage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse failure classes reported to the invoking surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotAuthenticated,
    InvalidAttachment,
    EmptyContent,
    RemoteFailure,
    Cancelled,
    Local,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated(_) => ErrorKind::NotAuthenticated,
            Self::InvalidAttachment { .. } => ErrorKind::InvalidAttachment,
            Self::EmptyContent => ErrorKind::EmptyContent,
            Self::ResourceUpload { .. } | Self::Remote(_) => ErrorKind::RemoteFailure,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config(_) | Self::SecureStorage(_) | Self::Io(_) | Self::Serialization(_) => {
                ErrorKind::Local
            }
        }
    }
}

/// Failures reported by a memos service client.
///
/// Timeouts are kept distinct for logging but are handled exactly like any
/// other transport failure.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request to the memos server timed out")]
    Timeout,

    #[error("Memos server rejected the credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Memos API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode memos response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error)
        }
    }
}
