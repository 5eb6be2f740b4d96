/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for grabdeck-adapter tests

use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Task payload shaped the way the download service emits it
pub fn task_json(task_id: &str, status: &str, progress: f64) -> serde_json::Value {
    serde_json::json!({
        "task_id": task_id,
        "url": "https://www.bilibili.com/video/BV1xx",
        "status": status,
        "progress": progress,
        "speed": "0 KB/s",
        "eta": "--",
        "title": "fetching...",
        "thumbnail": "",
        "file_size": "unknown",
        "downloaded_size": "0 MB",
        "error_message": "",
        "output_file": ""
    })
}
