//! Constants for the download module.

/// HTTP connect timeout (30 seconds).
///
/// No overall request timeout is set, so a large attachment may take as long
/// as the transfer needs.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;
