//! Test utilities for integration tests
#![allow(dead_code)]
use std::time::Duration;

use nafas::client::HttpChatService;
use nafas::core::StaticCredentialStore;
use nafas::session::Session;

pub const TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";

/// An HTTP client pointed at a mock server, authenticated with
/// `token`.
pub fn test_service(url: &str, token: Option<&str>) -> HttpChatService {
    let credentials = StaticCredentialStore::new(token);
    HttpChatService::new(url, Box::new(credentials), Duration::from_secs(5))
        .expect("Failed to build HTTP client")
}

/// A session against a mock server, logged in with `TOKEN`.
pub fn test_session(url: &str) -> Session {
    Session::new(Box::new(test_service(url, Some(TOKEN))))
}

pub const CHATS_BODY: &str = r#"[
    {
        "id": 1,
        "created_at": "2025-03-01T09:00:00.000000",
        "summary": {"id": 10, "title": "Exam stress", "summary": "Worried about exams.", "dominant_emotion": "fear", "created_at": "2025-03-01T09:30:00.000000"}
    },
    {
        "id": 2,
        "created_at": "2025-03-02T18:00:00.000000",
        "summary": {"id": null, "title": null, "summary": null, "dominant_emotion": null, "created_at": null}
    }
]"#;

pub const MESSAGES_BODY: &str = r#"[
    {"id": 5, "sender": "user", "text": "I feel tired", "created_at": "2025-03-02T18:00:01"},
    {"id": 6, "sender": "assistant", "text": "That sounds hard. What happened?", "created_at": "2025-03-02T18:00:04"}
]"#;
