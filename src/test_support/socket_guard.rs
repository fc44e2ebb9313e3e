//! Lets wiremock tests bow out where localhost sockets cannot be bound.
//!
//! Compiled into the unit tests and, via `#[path]`, into `tests/support`.

use std::net::TcpListener;

use wiremock::MockServer;

/// Turns a missing socket into a hard failure instead of a skip.
const REQUIRE_SOCKETS_VAR: &str = "THREAD_DL_REQUIRE_SOCKET_TESTS";

/// Starts a mock board, or returns `None` when the sandbox forbids binding.
///
/// # Panics
///
/// When binding fails while `THREAD_DL_REQUIRE_SOCKET_TESTS` is truthy.
pub(crate) async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind(("127.0.0.1", 0)).is_ok() {
        return Some(MockServer::start().await);
    }

    assert!(
        !sockets_required(),
        "cannot bind a localhost socket although {REQUIRE_SOCKETS_VAR} is set"
    );
    eprintln!("no localhost socket available, skipping mock-board test");
    None
}

fn sockets_required() -> bool {
    std::env::var(REQUIRE_SOCKETS_VAR)
        .is_ok_and(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}
