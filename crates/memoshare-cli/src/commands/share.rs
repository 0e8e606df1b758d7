use std::path::PathBuf;

use memoshare_core::attachments::{AttachmentRef, ImageSource};
use memoshare_core::client::HttpConnector;
use memoshare_core::credentials::CredentialSource;
use memoshare_core::{Ingestor, ShareInput, ShareStatus};
use url::Url;

use crate::commands::common::read_piped_stdin;
use crate::error::CliError;

pub async fn run_share<C: CredentialSource>(
    source: C,
    text_parts: &[String],
    attachment_args: &[String],
) -> Result<(), CliError> {
    let mut text = text_parts.join(" ");
    if text.trim().is_empty() {
        if let Some(piped) = read_piped_stdin()? {
            text = piped;
        }
    }
    let input = build_share_input(text, attachment_args)?;

    let ingestor = Ingestor::new(source, HttpConnector::default());
    let result = ingestor.ingest_until(input, cancel_on_ctrl_c()).await;

    let status = ShareStatus::from_result(result);
    match &status {
        ShareStatus::Saved { memo } => {
            println!("{} (#{})", status.message(), memo.id);
            Ok(())
        }
        ShareStatus::Failed { .. } => Err(CliError::ShareFailed(status.message().to_string())),
    }
}

/// Turn raw CLI arguments into a share payload.
pub fn build_share_input(text: String, attachment_args: &[String]) -> Result<ShareInput, CliError> {
    let attachments = attachment_args
        .iter()
        .map(|raw| parse_attachment_arg(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let input = ShareInput::new(text, attachments);
    if !input.is_postable() {
        return Err(CliError::EmptyContent);
    }
    Ok(input)
}

/// Classify one `--attach` value.
///
/// http(s) URLs become links, image files (by extension) become images, and
/// any other existing file is passed along as an unsupported attachment.
pub fn parse_attachment_arg(raw: &str) -> Result<AttachmentRef, CliError> {
    let raw = raw.trim();
    // Bare paths and Windows drive letters fail to parse or parse with a
    // one-letter scheme; both fall through to the filesystem.
    let path = match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            if url.host_str().is_none() {
                return Err(CliError::InvalidAttachment(
                    raw.to_string(),
                    "link has no host".to_string(),
                ));
            }
            return Ok(AttachmentRef::Url(url));
        }
        Ok(url) if url.scheme() == "file" => url.to_file_path().map_err(|()| {
            CliError::InvalidAttachment(raw.to_string(), "not a local file URL".to_string())
        })?,
        _ => PathBuf::from(raw),
    };
    let path =
        std::fs::canonicalize(&path).map_err(|_| CliError::AttachmentNotFound(raw.to_string()))?;

    let mime_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    if mime_type.starts_with("image/") {
        let location = Url::from_file_path(&path).map_err(|()| {
            CliError::InvalidAttachment(raw.to_string(), "path is not absolute".to_string())
        })?;
        Ok(AttachmentRef::Image(ImageSource::from_location(location)))
    } else {
        Ok(AttachmentRef::Other {
            type_identifier: mime_type,
        })
    }
}

async fn cancel_on_ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", error);
        std::future::pending::<()>().await;
    }
}
