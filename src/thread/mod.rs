//! Thread metadata: the JSON document describing a thread and its attachments.
//!
//! The board exposes every thread as `/{board}/res/{thread}.json`. Only the
//! fields needed for downloading are modelled; everything else in the
//! document is ignored.

mod client;
mod error;

use serde::Deserialize;

pub use client::ThreadClient;
pub use error::ThreadError;

/// Thread document as served by the metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadMetadata {
    /// Thread title; `null` or missing when the opening post has none.
    #[serde(default)]
    pub subject: Option<String>,
    /// Posts in thread order, opening post first.
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// A single post; only its attachments matter here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub files: Vec<Attachment>,
}

/// One media file referenced by a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Server-side path below the media host, starting with `/`.
    pub path: String,
    /// File name as uploaded by the poster.
    pub original_name: String,
    /// Size in bytes as reported by the board.
    #[serde(default)]
    pub size: u64,
}

impl ThreadMetadata {
    /// Iterates all attachments in post order, then file order.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.posts.iter().flat_map(|post| post.files.iter())
    }

    /// Number of attachments across all posts.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.posts.iter().map(|post| post.files.len()).sum()
    }

    /// Subject as posted, `None` when missing or blank.
    #[must_use]
    pub fn non_empty_subject(&self) -> Option<&str> {
        self.subject
            .as_deref()
            .filter(|subject| !subject.trim().is_empty())
    }
}
