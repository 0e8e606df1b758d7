//! Share attachment classification and normalization.
//!
//! Every attachment is classified once into [`AttachmentClass`]; images are
//! loaded and re-encoded, URLs become link text, everything else is skipped.
//! Nothing here touches the network.

pub mod image;

use url::Url;
use uuid::Uuid;

use self::image::{decode_image, encode_jpeg, JPEG_MIME_TYPE};
use crate::{Error, Result};

/// Image payload as delivered by the share sheet.
///
/// Either an in-memory image, a file URL, or both. The inline bytes are tried
/// first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSource {
    pub inline: Option<Vec<u8>>,
    pub location: Option<Url>,
}

impl ImageSource {
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            inline: Some(bytes),
            location: None,
        }
    }

    #[must_use]
    pub const fn from_location(location: Url) -> Self {
        Self {
            inline: None,
            location: Some(location),
        }
    }
}

/// One raw share attachment with its declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentRef {
    Image(ImageSource),
    Url(Url),
    /// Metadata or unsupported payloads, keyed by their type identifier.
    Other { type_identifier: String },
}

/// Result of the classification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentClass {
    Image,
    LinkText,
    Skipped,
}

impl AttachmentRef {
    #[must_use]
    pub const fn classify(&self) -> AttachmentClass {
        match self {
            Self::Image(_) => AttachmentClass::Image,
            Self::Url(_) => AttachmentClass::LinkText,
            Self::Other { .. } => AttachmentClass::Skipped,
        }
    }
}

/// Attachment ready for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedAttachment {
    Image {
        bytes: Vec<u8>,
        mime_type: String,
        suggested_filename: String,
    },
    LinkText {
        value: String,
    },
}

/// Normalize a single attachment; `Ok(None)` means it was skipped.
pub async fn normalize_attachment(
    index: usize,
    attachment: &AttachmentRef,
) -> Result<Option<NormalizedAttachment>> {
    match attachment {
        AttachmentRef::Image(source) => {
            let decoded = load_image(index, source).await?;
            let encoded = encode_jpeg(&decoded).map_err(|reason| invalid(index, reason))?;
            tracing::debug!(
                "Re-encoded attachment #{} as {}x{} JPEG ({} bytes)",
                index,
                encoded.width,
                encoded.height,
                encoded.bytes.len()
            );
            Ok(Some(NormalizedAttachment::Image {
                bytes: encoded.bytes,
                mime_type: JPEG_MIME_TYPE.to_string(),
                suggested_filename: format!("{}.jpg", Uuid::now_v7()),
            }))
        }
        AttachmentRef::Url(url) => Ok(Some(NormalizedAttachment::LinkText {
            value: url.as_str().to_string(),
        })),
        AttachmentRef::Other { type_identifier } => {
            tracing::debug!(
                "Skipping attachment #{} of unsupported type {}",
                index,
                type_identifier
            );
            Ok(None)
        }
    }
}

/// Normalize attachments in order, dropping skipped ones.
pub async fn normalize(attachments: &[AttachmentRef]) -> Result<Vec<NormalizedAttachment>> {
    let mut normalized = Vec::with_capacity(attachments.len());
    for (index, attachment) in attachments.iter().enumerate() {
        if let Some(item) = normalize_attachment(index, attachment).await? {
            normalized.push(item);
        }
    }
    Ok(normalized)
}

async fn load_image(index: usize, source: &ImageSource) -> Result<::image::DynamicImage> {
    let mut inline_error = None;
    if let Some(bytes) = &source.inline {
        match decode_image(bytes) {
            Ok(image) => return Ok(image),
            Err(error) => {
                tracing::debug!(
                    "Inline image for attachment #{} did not decode: {}",
                    index,
                    error
                );
                inline_error = Some(error);
            }
        }
    }

    let Some(location) = &source.location else {
        return Err(invalid(
            index,
            inline_error.unwrap_or_else(|| "no image data was provided".to_string()),
        ));
    };

    let path = location
        .to_file_path()
        .map_err(|()| invalid(index, format!("unsupported image location {location}")))?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|error| invalid(index, format!("failed to read {}: {error}", path.display())))?;
    decode_image(&bytes).map_err(|reason| invalid(index, reason))
}

fn invalid(index: usize, reason: String) -> Error {
    Error::InvalidAttachment { index, reason }
}
