//! Share ingestion: turns one share payload into one memo.

use std::future::Future;

use crate::attachments::{
    normalize_attachment, AttachmentClass, AttachmentRef, NormalizedAttachment,
};
use crate::client::{MemosConnector, MemosService};
use crate::credentials::{resolve_credentials, CredentialSource};
use crate::error::ErrorKind;
use crate::models::{MemoCreateRequest, MemoRecord, ResourceId};
use crate::tags::extract_tags;
use crate::{Error, Result};

/// Raw payload handed over by the share surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareInput {
    pub text: String,
    pub attachments: Vec<AttachmentRef>,
}

impl ShareInput {
    #[must_use]
    pub fn new(text: impl Into<String>, attachments: Vec<AttachmentRef>) -> Self {
        Self {
            text: text.into(),
            attachments,
        }
    }

    /// Whether there is anything worth posting at all: some text, an image,
    /// or a link.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        !self.text.trim().is_empty()
            || self
                .attachments
                .iter()
                .any(|attachment| attachment.classify() != AttachmentClass::Skipped)
    }
}

/// Runs share ingestions against a memos server.
#[derive(Debug, Clone)]
pub struct Ingestor<C, K> {
    source: C,
    connector: K,
}

impl<C, K> Ingestor<C, K>
where
    C: CredentialSource,
    K: MemosConnector,
{
    pub const fn new(source: C, connector: K) -> Self {
        Self { source, connector }
    }

    pub const fn source(&self) -> &C {
        &self.source
    }

    /// Ingest one share payload and return the created memo.
    ///
    /// Every attachment is normalized before the first upload, so a bad
    /// attachment leaves nothing on the server. Uploads then run one at a
    /// time in attachment order. An upload failure aborts the attempt before
    /// anything references the uploaded resources; a tag failure only logs a
    /// warning.
    pub async fn ingest(&self, input: ShareInput) -> Result<MemoRecord> {
        let credentials = resolve_credentials(&self.source)?;
        if !input.is_postable() {
            return Err(Error::EmptyContent);
        }

        let service = self.connector.connect(&credentials)?;
        if let Err(error) = service.check_status().await {
            tracing::warn!(
                "Status check against {} failed, continuing: {}",
                credentials.host,
                error
            );
        }

        let mut normalized = Vec::with_capacity(input.attachments.len());
        for (index, attachment) in input.attachments.iter().enumerate() {
            if let Some(attachment) = normalize_attachment(index, attachment).await? {
                normalized.push((index, attachment));
            }
        }

        let mut lines = vec![input.text];
        let mut resource_ids: Vec<ResourceId> = Vec::new();
        for (index, attachment) in normalized {
            match attachment {
                NormalizedAttachment::Image {
                    bytes,
                    mime_type,
                    suggested_filename,
                } => {
                    let resource = service
                        .upload_resource(bytes, &suggested_filename, &mime_type)
                        .await
                        .map_err(|source| Error::ResourceUpload { index, source })?;
                    tracing::info!(
                        "Uploaded attachment #{} as resource {}",
                        index,
                        resource.id
                    );
                    resource_ids.push(resource.id);
                }
                NormalizedAttachment::LinkText { value } => lines.push(value),
            }
        }

        let content = lines.join("\n").trim().to_string();
        let request = MemoCreateRequest::new(content, resource_ids)?;

        for tag in extract_tags(&request.content) {
            if let Err(error) = service.upsert_tag(&tag).await {
                tracing::warn!("Failed to upsert tag {}: {}", tag, error);
            }
        }

        let memo = service.create_memo(&request).await?;
        tracing::info!(
            "Created memo {} with {} resource(s)",
            memo.id,
            request.resource_id_list.len()
        );
        Ok(memo)
    }

    /// Like [`Self::ingest`], but gives up with [`Error::Cancelled`] as soon
    /// as `cancel` resolves.
    ///
    /// Resources uploaded before cancellation stay on the server unreferenced.
    pub async fn ingest_until<F>(&self, input: ShareInput, cancel: F) -> Result<MemoRecord>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::info!("Share cancelled by the caller");
                Err(Error::Cancelled)
            }
            result = self.ingest(input) => result,
        }
    }
}

/// Terminal outcome shown by the share surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareStatus {
    Saved { memo: MemoRecord },
    Failed { kind: ErrorKind, message: String },
}

impl ShareStatus {
    #[must_use]
    pub fn from_result(result: Result<MemoRecord>) -> Self {
        match result {
            Ok(memo) => Self::Saved { memo },
            Err(error) => Self::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Saved { .. } => "Memo saved.",
            Self::Failed { message, .. } => message,
        }
    }
}
