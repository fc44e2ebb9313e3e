//! Thread-link parsing.
//!
//! Accepts links of the form `https://{host}/{board}/res/{thread}.{ext}` and
//! extracts the board shortcut and numeric thread id. The host of the link is
//! not used afterwards; metadata and media always come from the configured
//! base URL.
//!
//! # Example
//!
//! ```
//! use thread_dl_core::parser::ThreadReference;
//!
//! let thread = ThreadReference::parse("https://kohlchan.net/tech/res/12345.html").unwrap();
//! assert_eq!(thread.board(), "tech");
//! assert_eq!(thread.thread_id(), "12345");
//! ```

mod error;

use std::fmt;

use tracing::debug;
use url::Url;

pub use error::{MAX_URL_LENGTH, ParseError};

/// Path segment between board and thread id.
const THREAD_SEGMENT: &str = "res";

/// Board and thread identifiers of a single thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadReference {
    board: String,
    thread_id: String,
}

impl ThreadReference {
    /// Parses a thread link.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the input is not an http(s) URL, the path is
    /// not exactly `/{board}/res/{thread}[.ext]`, or the thread id is not made
    /// of ASCII digits.
    #[tracing::instrument(level = "debug")]
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.len() > MAX_URL_LENGTH {
            return Err(ParseError::too_long(input));
        }

        let url = Url::parse(input).map_err(|e| ParseError::malformed(input, &e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ParseError::unsupported_scheme(input, url.scheme()));
        }

        let mut segments: Vec<&str> = url
            .path_segments()
            .map(Iterator::collect)
            .unwrap_or_default();
        if segments.last().is_some_and(|last| last.is_empty()) {
            segments.pop();
        }

        let [board, res, thread_file] = segments.as_slice() else {
            return Err(ParseError::not_a_thread_link(
                input,
                format!("expected 3 path segments, found {}", segments.len()),
            ));
        };
        if board.is_empty() {
            return Err(ParseError::not_a_thread_link(input, "board shortcut is empty"));
        }
        if *res != THREAD_SEGMENT {
            return Err(ParseError::not_a_thread_link(
                input,
                format!("expected '{THREAD_SEGMENT}' after the board, found '{res}'"),
            ));
        }

        let thread_id = thread_file.split('.').next().unwrap_or_default();
        if thread_id.is_empty() || !thread_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::non_numeric(input, thread_id));
        }

        debug!(board = %board, thread_id, "parsed thread link");
        Ok(Self {
            board: (*board).to_string(),
            thread_id: thread_id.to_string(),
        })
    }

    /// Builds a reference from already validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when `board` is empty or `thread_id` is not numeric.
    pub fn new(board: impl Into<String>, thread_id: impl Into<String>) -> Result<Self, ParseError> {
        let board = board.into();
        let thread_id = thread_id.into();
        let display = format!("/{board}/res/{thread_id}");
        if board.is_empty() || board.contains('/') {
            return Err(ParseError::not_a_thread_link(&display, "invalid board shortcut"));
        }
        if thread_id.is_empty() || !thread_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::non_numeric(&display, &thread_id));
        }
        Ok(Self { board, thread_id })
    }

    /// Board shortcut, e.g. `tech`.
    #[must_use]
    pub fn board(&self) -> &str {
        &self.board
    }

    /// Numeric thread id.
    #[must_use]
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }
}

impl fmt::Display for ThreadReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.board, self.thread_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_html_thread_link() {
        let thread = ThreadReference::parse("https://kohlchan.net/tech/res/12345.html").unwrap();
        assert_eq!(thread.board(), "tech");
        assert_eq!(thread.thread_id(), "12345");
    }

    #[test]
    fn test_parse_strips_every_extension_and_fragment() {
        let thread =
            ThreadReference::parse("https://kohlchan.net/b/res/987.json.bak#q990").unwrap();
        assert_eq!(thread.thread_id(), "987");
    }

    #[test]
    fn test_parse_without_extension() {
        let thread = ThreadReference::parse("http://kohlchan.net/int/res/42").unwrap();
        assert_eq!(thread.board(), "int");
        assert_eq!(thread.thread_id(), "42");
    }

    #[test]
    fn test_parse_tolerates_trailing_slash_and_whitespace() {
        let thread = ThreadReference::parse("  https://kohlchan.net/tech/res/12345.html/\n").unwrap();
        assert_eq!(thread.thread_id(), "12345");
    }

    #[test]
    fn test_parse_rejects_non_numeric_thread_id() {
        let err = ThreadReference::parse("https://kohlchan.net/tech/res/12a45.html").unwrap_err();
        assert!(matches!(err, ParseError::NonNumericThreadId { .. }));
    }

    #[test]
    fn test_parse_rejects_unicode_digits() {
        let err = ThreadReference::parse("https://kohlchan.net/tech/res/١٢٣.html").unwrap_err();
        assert!(matches!(err, ParseError::NonNumericThreadId { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_thread_id() {
        let err = ThreadReference::parse("https://kohlchan.net/tech/res/.html").unwrap_err();
        assert!(matches!(err, ParseError::NonNumericThreadId { .. }));
    }

    #[test]
    fn test_parse_rejects_short_path() {
        let err = ThreadReference::parse("https://kohlchan.net/tech/").unwrap_err();
        assert!(matches!(err, ParseError::NotAThreadLink { .. }));
    }

    #[test]
    fn test_parse_rejects_extra_segments() {
        let err =
            ThreadReference::parse("https://kohlchan.net/tech/res/12345.html/extra").unwrap_err();
        assert!(matches!(err, ParseError::NotAThreadLink { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_res_segment() {
        let err = ThreadReference::parse("https://kohlchan.net/tech/catalog/12345.html").unwrap_err();
        assert!(matches!(err, ParseError::NotAThreadLink { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_board() {
        let err = ThreadReference::parse("https://kohlchan.net//res/12345.html").unwrap_err();
        assert!(matches!(err, ParseError::NotAThreadLink { .. }));
    }

    #[test]
    fn test_parse_rejects_non_url_input() {
        let err = ThreadReference::parse("threads.txt").unwrap_err();
        assert!(matches!(err, ParseError::InvalidUrl { .. }));
    }

    #[test]
    fn test_parse_rejects_ftp_scheme() {
        let err = ThreadReference::parse("ftp://kohlchan.net/tech/res/1.html").unwrap_err();
        assert!(matches!(err, ParseError::InvalidUrl { .. }));
    }

    #[test]
    fn test_parse_rejects_overlong_input() {
        let long = format!("https://kohlchan.net/tech/res/{}.html", "1".repeat(2100));
        let err = ThreadReference::parse(&long).unwrap_err();
        assert!(matches!(err, ParseError::UrlTooLong { .. }));
    }

    #[test]
    fn test_new_validates_parts() {
        assert!(ThreadReference::new("tech", "123").is_ok());
        assert!(ThreadReference::new("", "123").is_err());
        assert!(ThreadReference::new("tech", "12x").is_err());
    }

    #[test]
    fn test_display_shows_board_and_thread() {
        let thread = ThreadReference::new("tech", "123").unwrap();
        assert_eq!(thread.to_string(), "/tech/123");
    }
}
