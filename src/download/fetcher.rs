//! Per-attachment download step.
//!
//! [`AttachmentFetcher::fetch_one`] never decides what happens to the rest of
//! the thread; it reports a [`FetchOutcome`] and the caller applies its
//! failure policy.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use super::filename::attachment_file_name;
use super::{DownloadError, HttpClient};
use crate::config::NamingScheme;
use crate::storage::DiskInspector;
use crate::thread::Attachment;

/// Result of handling one attachment.
#[derive(Debug)]
pub enum FetchOutcome {
    /// File was transferred and written completely.
    Downloaded { path: PathBuf, bytes: u64 },
    /// A file with the derived name already existed.
    Skipped { path: PathBuf },
    /// Naming or transfer failed.
    Failed(DownloadError),
}

impl FetchOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Downloads attachments of one thread into one directory.
#[derive(Debug, Clone)]
pub struct AttachmentFetcher {
    http: HttpClient,
    media_base_url: String,
    naming: NamingScheme,
}

impl AttachmentFetcher {
    #[must_use]
    pub fn new(http: HttpClient, media_base_url: impl Into<String>, naming: NamingScheme) -> Self {
        let media_base_url = media_base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            media_base_url,
            naming,
        }
    }

    /// Absolute media URL: media host followed by the attachment's path.
    #[must_use]
    pub fn media_url(&self, attachment: &Attachment) -> String {
        format!("{}{}", self.media_base_url, attachment.path)
    }

    /// Downloads `attachment` into `target_dir` unless its file already exists.
    pub async fn fetch_one<D>(
        &self,
        target_dir: &Path,
        attachment: &Attachment,
        disk: &D,
    ) -> FetchOutcome
    where
        D: DiskInspector + ?Sized,
    {
        let Some(file_name) = attachment_file_name(attachment, self.naming) else {
            let err = DownloadError::unnamed(&attachment.path);
            error!(error = %err, "attachment skipped");
            return FetchOutcome::Failed(err);
        };

        let path = target_dir.join(&file_name);
        if disk.exists(&path) {
            debug!(file = %file_name, "already downloaded");
            return FetchOutcome::Skipped { path };
        }

        let url = self.media_url(attachment);
        info!(url = %url, file = %file_name, "trying to download");
        match self.http.download_to_path(&url, &path).await {
            Ok(bytes) => FetchOutcome::Downloaded { path, bytes },
            Err(err) => {
                error!(url = %url, error = %err, "could not be loaded");
                FetchOutcome::Failed(err)
            }
        }
    }
}
