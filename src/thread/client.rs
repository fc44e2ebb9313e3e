//! Client for the thread metadata endpoint.

use reqwest::Client;
use tracing::{debug, info, instrument};

use super::{ThreadError, ThreadMetadata};
use crate::parser::ThreadReference;

/// Fetches thread documents from `{base_url}/{board}/res/{thread}.json`.
///
/// A single GET per call; failures are returned as-is and never retried.
#[derive(Debug, Clone)]
pub struct ThreadClient {
    client: Client,
    base_url: String,
}

impl ThreadClient {
    /// Creates a client that reuses an existing connection pool.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Metadata URL for `thread`.
    #[must_use]
    pub fn metadata_url(&self, thread: &ThreadReference) -> String {
        format!(
            "{}/{}/res/{}.json",
            self.base_url,
            thread.board(),
            thread.thread_id()
        )
    }

    /// Retrieves and decodes the thread document.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadError`] when the request fails, the server answers with a
    /// non-success status, or the body is not a thread document.
    #[instrument(skip(self), fields(thread = %thread))]
    pub async fn fetch(&self, thread: &ThreadReference) -> Result<ThreadMetadata, ThreadError> {
        let url = self.metadata_url(thread);
        debug!(url = %url, "requesting thread metadata");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ThreadError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThreadError::http_status(&url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ThreadError::network(&url, e))?;
        let metadata: ThreadMetadata =
            serde_json::from_slice(&body).map_err(|e| ThreadError::malformed(&url, e))?;

        info!(
            posts = metadata.posts.len(),
            attachments = metadata.attachment_count(),
            "thread metadata received"
        );
        Ok(metadata)
    }
}
