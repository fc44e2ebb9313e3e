//! Error types for attachment downloads.
//!
//! Every variant carries the URL or path it concerns so a single log line is
//! enough to tell which attachment failed and why.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading a single attachment.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Connection could not be established within the connect timeout.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during download (create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// No local file name can be derived for the attachment.
    #[error("cannot derive a file name for attachment {remote_path}")]
    Unnamed {
        /// The attachment's server-side path.
        remote_path: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an error for an attachment that cannot be named.
    pub fn unnamed(remote_path: impl Into<String>) -> Self {
        Self::Unnamed {
            remote_path: remote_path.into(),
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// URL or path, which the source errors do not carry.
