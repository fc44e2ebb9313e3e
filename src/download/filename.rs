//! Local names for thread directories and attachment files.
//!
//! Every name is a pure function of the thread/attachment and the
//! [`NamingScheme`]; download order and disk state never influence it.

use std::path::{Component, Path};

use crate::config::NamingScheme;
use crate::parser::ThreadReference;
use crate::thread::{Attachment, ThreadMetadata};

/// Local file name for `attachment`, or `None` when the scheme cannot derive one.
///
/// - [`NamingScheme::OriginalName`]: the poster's `originalName`.
/// - [`NamingScheme::BoardId`]: the third `/`-separated segment of `path`
///   (`"/.media/abc.png"` → `"abc.png"`).
#[must_use]
pub fn attachment_file_name(attachment: &Attachment, scheme: NamingScheme) -> Option<String> {
    let raw = match scheme {
        NamingScheme::OriginalName => attachment.original_name.as_str(),
        NamingScheme::BoardId => board_file_id(&attachment.path)?,
    };
    if raw.trim().is_empty() {
        return None;
    }
    Some(sanitize_filename(raw))
}

/// Directory name for a thread: its subject, or the thread id when board ids
/// are requested or the subject is blank.
#[must_use]
pub fn thread_dir_name(
    thread: &ThreadReference,
    metadata: &ThreadMetadata,
    scheme: NamingScheme,
) -> String {
    match (scheme, metadata.non_empty_subject()) {
        (NamingScheme::OriginalName, Some(subject)) => sanitize_filename(subject),
        _ => thread.thread_id().to_string(),
    }
}

fn board_file_id(path: &str) -> Option<&str> {
    path.split('/').nth(2).filter(|id| !id.is_empty())
}

/// Sanitizes a name for use as a single path component.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
