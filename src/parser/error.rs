//! Error types for thread-link parsing.

use thiserror::Error;

/// Maximum thread-link length to accept (standard browser limit).
pub const MAX_URL_LENGTH: usize = 2000;

/// Errors that can occur while turning a thread link into a [`ThreadReference`].
///
/// [`ThreadReference`]: super::ThreadReference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input is not an http(s) URL at all.
    #[error("invalid thread URL '{url}': {reason}\n  Suggestion: {suggestion}")]
    InvalidUrl {
        /// The input that failed validation
        url: String,
        /// Why the input was rejected
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// URL path does not look like `/{board}/res/{thread}.{ext}`.
    #[error(
        "'{url}' is not a thread link: {reason}\n  Suggestion: pass a link of the form https://host/{{board}}/res/{{thread}}.html"
    )]
    NotAThreadLink {
        /// The offending URL
        url: String,
        /// Which part of the path is wrong
        reason: String,
    },

    /// Thread identifier contains something other than decimal digits.
    #[error("thread identifier '{thread_id}' in '{url}' should be numerical")]
    NonNumericThreadId {
        /// The offending URL
        url: String,
        /// The extracted identifier
        thread_id: String,
    },

    /// Input exceeds [`MAX_URL_LENGTH`].
    #[error("thread URL too long ({length} chars, max {max}): {url_preview}...")]
    UrlTooLong {
        /// Truncated URL for display
        url_preview: String,
        /// Actual length
        length: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl ParseError {
    /// Creates an `InvalidUrl` error for a non-web URL scheme.
    #[must_use]
    pub fn unsupported_scheme(url: &str, scheme: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: format!("scheme '{scheme}' is not supported"),
            suggestion: "Use http:// or https:// URLs".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for input the URL parser rejects.
    #[must_use]
    pub fn malformed(url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: parse_error.to_string(),
            suggestion: "Check the URL format and try again".to_string(),
        }
    }

    /// Creates a `NotAThreadLink` error.
    #[must_use]
    pub fn not_a_thread_link(url: &str, reason: impl Into<String>) -> Self {
        Self::NotAThreadLink {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `NonNumericThreadId` error.
    #[must_use]
    pub fn non_numeric(url: &str, thread_id: &str) -> Self {
        Self::NonNumericThreadId {
            url: url.to_string(),
            thread_id: thread_id.to_string(),
        }
    }

    /// Creates a `UrlTooLong` error for input exceeding the maximum length.
    #[must_use]
    pub fn too_long(url: &str) -> Self {
        Self::UrlTooLong {
            url_preview: url.chars().take(50).collect(),
            length: url.len(),
            max: MAX_URL_LENGTH,
        }
    }
}
