//! HTTP client wrapper for streaming attachments to disk.
//!
//! This module provides the `HttpClient` struct which performs a single GET
//! per attachment and copies the body byte-for-byte into a local file.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::DownloadError;
use crate::user_agent;

/// Builds the shared reqwest client used for metadata and media requests.
///
/// # Errors
///
/// Returns [`DownloadError::Client`] if the TLS backend or system
/// configuration prevents the client from being built.
pub fn build_client() -> Result<Client, DownloadError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
        .build()
        .map_err(|source| DownloadError::Client { source })
}

/// HTTP client for downloading attachments with streaming support.
///
/// Created once per run and reused for every attachment so connections to the
/// media host are pooled.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] when the client cannot be built.
    pub fn new() -> Result<Self, DownloadError> {
        Ok(Self::from_client(build_client()?))
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Downloads `url` into a new file at `file_path`, returning bytes written.
    ///
    /// The file is only created after the server answered with a success
    /// status. If the body stream breaks, the partial file is removed.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The request fails (network error, connect timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Creating or writing the file fails
    #[instrument(skip(self, file_path), fields(url = %url, path = %file_path.display()))]
    pub async fn download_to_path(&self, url: &str, file_path: &Path) -> Result<u64, DownloadError> {
        debug!("starting download");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let mut file = File::create(file_path)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        let stream_result = stream_to_file(&mut file, response, url, file_path).await;
        if stream_result.is_err() {
            debug!("cleaning up partial file after error");
            drop(file);
            let _ = tokio::fs::remove_file(file_path).await;
        }
        let bytes_written = stream_result?;

        info!(bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}
