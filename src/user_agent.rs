//! User-Agent string sent with metadata and media requests.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/thread-dl";

/// Default User-Agent identifying the tool and its version.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("thread-dl/{version} (media-archiver; +{PROJECT_UA_URL})")
}
