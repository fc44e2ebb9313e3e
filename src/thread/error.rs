//! Error types for thread metadata retrieval.

use thiserror::Error;

/// Errors that can occur while fetching thread metadata.
#[derive(Debug, Error)]
pub enum ThreadError {
    /// Request could not be sent or the connection broke.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// Metadata URL that was requested.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status (e.g. 404 for a pruned thread).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// Metadata URL that was requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Body was not a valid thread document.
    #[error("malformed thread metadata from {url}: {reason}")]
    Malformed {
        /// Metadata URL that was requested.
        url: String,
        /// Decoder message.
        reason: String,
    },
}

impl ThreadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
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

    /// Creates a malformed-document error.
    pub fn malformed(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
