#![allow(dead_code)]

#[path = "../../src/test_support/socket_guard.rs"]
pub mod socket_guard;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Thread `/tech/res/12345` with three attachments in two posts.
pub const THREAD_JSON: &str = r#"{
    "threadId": 12345,
    "subject": "Sample Thread",
    "posts": [
        {"postId": 12346, "files": [
            {"path": "/.media/aaa-imagepng.png", "originalName": "first.png", "size": 5}
        ]},
        {"postId": 12347, "files": [
            {"path": "/.media/bbb-imagejpeg.jpg", "originalName": "second.jpg", "size": 6},
            {"path": "/.media/ccc-videowebm.webm", "originalName": "third.webm", "size": 5}
        ]}
    ]
}"#;

/// Media path and body of every attachment in [`THREAD_JSON`], in thread order.
pub const MEDIA: [(&str, &[u8]); 3] = [
    ("/.media/aaa-imagepng.png", b"first"),
    ("/.media/bbb-imagejpeg.jpg", b"second"),
    ("/.media/ccc-videowebm.webm", b"third"),
];

pub const THREAD_URL: &str = "https://kohlchan.net/tech/res/12345.html";

pub async fn mount_thread(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/tech/res/12345.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(THREAD_JSON))
        .mount(server)
        .await;
}

pub async fn mount_all_media(server: &MockServer) {
    for (media_path, body) in MEDIA {
        Mock::given(method("GET"))
            .and(path(media_path))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(server)
            .await;
    }
}

/// Number of requests the server received for media files.
pub async fn media_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path().starts_with("/.media/"))
        .count()
}
