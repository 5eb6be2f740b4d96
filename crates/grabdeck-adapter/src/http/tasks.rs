/*
[INPUT]:  Task ids, download requests and folder paths
[OUTPUT]: Task snapshots, creation results and control acknowledgements
[POS]:    HTTP layer - download task endpoints
[UPDATE]: When adding new task endpoints or changing response format
*/

use reqwest::Method;
use tracing::debug;

use crate::http::{Result, TaskClient};
use crate::types::{
    ActionAck, CreateDownloadResponse, DetectRequest, DetectResponse, DownloadRequest,
    OpenFolderRequest, Task, TaskListResponse,
};

impl TaskClient {
    /// List every task the service knows about
    ///
    /// GET /api/tasks
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let builder = self.request(Method::GET, &["api", "tasks"])?;
        let response: TaskListResponse = self.send_json(builder).await?;
        debug!(count = response.tasks.len(), "task list received");
        Ok(response.tasks)
    }

    /// Fetch a single task
    ///
    /// GET /api/task/{task_id}
    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        let builder = self.request(Method::GET, &["api", "task", task_id])?;
        self.send_json(builder).await
    }

    /// Submit a new download
    ///
    /// POST /api/download
    pub async fn create_download(&self, req: &DownloadRequest) -> Result<CreateDownloadResponse> {
        let builder = self.request(Method::POST, &["api", "download"])?.json(req);
        self.send_json(builder).await
    }

    /// POST /api/task/{task_id}/pause
    pub async fn pause_task(&self, task_id: &str) -> Result<ActionAck> {
        self.task_action(task_id, "pause").await
    }

    /// POST /api/task/{task_id}/resume
    pub async fn resume_task(&self, task_id: &str) -> Result<ActionAck> {
        self.task_action(task_id, "resume").await
    }

    /// POST /api/task/{task_id}/cancel
    pub async fn cancel_task(&self, task_id: &str) -> Result<ActionAck> {
        self.task_action(task_id, "cancel").await
    }

    /// Ask the service host to reveal a folder
    ///
    /// POST /api/open-folder
    pub async fn open_folder(&self, path: &str) -> Result<ActionAck> {
        let req = OpenFolderRequest {
            path: path.to_string(),
        };
        let builder = self.request(Method::POST, &["api", "open-folder"])?.json(&req);
        self.send_json(builder).await
    }

    /// Platform and extractor metadata for a link, without starting anything
    ///
    /// POST /api/detect
    pub async fn detect(&self, url: &str) -> Result<DetectResponse> {
        let req = DetectRequest {
            url: url.to_string(),
        };
        let builder = self.request(Method::POST, &["api", "detect"])?.json(&req);
        self.send_json(builder).await
    }

    async fn task_action(&self, task_id: &str, action: &str) -> Result<ActionAck> {
        let builder = self.request(Method::POST, &["api", "task", task_id, action])?;
        let ack: ActionAck = self.send_json(builder).await?;
        debug!(task_id = %task_id, action = %action, status = ?ack.status, "task action acknowledged");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, ClientError, TaskClient};
    use crate::types::{DownloadOptions, DownloadRequest, TaskStatus};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TaskClient {
        TaskClient::with_config(ClientConfig::default(), &server.uri()).expect("client init")
    }

    #[tokio::test]
    async fn test_list_tasks() {
        let server = MockServer::start().await;
        let mock_response = r#"{
            "tasks": [
                {
                    "task_id": "a",
                    "url": "https://b23.tv/xyz",
                    "status": "downloading",
                    "progress": 40,
                    "speed": "2.1MiB/s",
                    "eta": "00:12",
                    "title": "first",
                    "thumbnail": "",
                    "file_size": "80.00 MB",
                    "downloaded_size": "0 MB",
                    "error_message": "",
                    "output_file": ""
                },
                {
                    "task_id": "b",
                    "status": "failed",
                    "progress": 3.5,
                    "error_message": "user cancelled"
                }
            ]
        }"#;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(mock_response, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = client_for(&server).list_tasks().await.expect("list_tasks failed");

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "a");
        assert_eq!(tasks[0].progress, 40.0);
        assert_eq!(tasks[1].status, TaskStatus::Failed);
        assert_eq!(tasks[1].error_message.as_deref(), Some("user cancelled"));
    }

    #[tokio::test]
    async fn test_list_tasks_rejects_body_without_tasks() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server).list_tasks().await.unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_create_download_posts_url_and_options() {
        let server = MockServer::start().await;
        let request = DownloadRequest {
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            options: DownloadOptions {
                quality: "1080p".to_string(),
                output_dir: "/tmp/videos".to_string(),
                use_proxy: false,
            },
        };

        let _mock = Mock::given(method("POST"))
            .and(path("/api/download"))
            .and(body_json(serde_json::json!({
                "url": "https://www.youtube.com/watch?v=abc",
                "options": {
                    "quality": "1080p",
                    "output_dir": "/tmp/videos",
                    "use_proxy": false
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "new-task",
                "status": "started"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .create_download(&request)
            .await
            .expect("create_download failed");
        assert_eq!(response.task_id, "new-task");
        assert_eq!(response.status.as_deref(), Some("started"));
    }

    #[tokio::test]
    async fn test_create_download_surfaces_service_error() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/api/download"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "missing url"
            })))
            .mount(&server)
            .await;

        let request = DownloadRequest {
            url: String::new(),
            options: DownloadOptions::default(),
        };
        let err = client_for(&server).create_download(&request).await.unwrap_err();
        match err {
            ClientError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "missing url");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_task_actions_hit_expected_paths() {
        let server = MockServer::start().await;
        for action in ["pause", "resume", "cancel"] {
            Mock::given(method("POST"))
                .and(path(format!("/api/task/t-1/{action}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "status": action
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server);
        let paused = client.pause_task("t-1").await.expect("pause");
        let resumed = client.resume_task("t-1").await.expect("resume");
        let cancelled = client.cancel_task("t-1").await.expect("cancel");

        assert_eq!(paused.status.as_deref(), Some("pause"));
        assert_eq!(resumed.status.as_deref(), Some("resume"));
        assert_eq!(cancelled.status.as_deref(), Some("cancel"));
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_found() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/api/task/missing/pause"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "task not found"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).pause_task("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "task not found");
    }

    #[tokio::test]
    async fn test_open_folder_error_without_json_body() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/api/open-folder"))
            .and(body_json(serde_json::json!({ "path": "/data/out" })))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server).open_folder("/data/out").await.unwrap_err();
        match err {
            ClientError::Api { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_task() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/api/task/t-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t-9",
                "status": "completed",
                "progress": 100,
                "output_file": "/data/out"
            })))
            .mount(&server)
            .await;

        let task = client_for(&server).get_task("t-9").await.expect("get_task failed");
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.output_file.as_deref(), Some("/data/out"));
    }

    #[tokio::test]
    async fn test_detect_posts_url() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/api/detect"))
            .and(body_json(serde_json::json!({ "url": "https://b23.tv/xyz" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "platform": "bilibili",
                "info": {
                    "title": "clip",
                    "thumbnail": "https://i0.hdslb.com/x.jpg",
                    "duration": 95,
                    "filesize": 10485760
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let detected = client_for(&server).detect("https://b23.tv/xyz").await.expect("detect failed");
        assert_eq!(detected.platform, "bilibili");
        assert_eq!(detected.info.duration_secs(), 95);
        assert_eq!(detected.info.filesize_bytes(), 10_485_760);
    }
}
