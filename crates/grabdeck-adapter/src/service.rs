/*
[INPUT]:  Task ids, download requests and folder paths
[OUTPUT]: Object-safe async seam over the download service
[POS]:    Service layer - what the console engine depends on instead of TaskClient
[UPDATE]: When TaskClient gains or loses endpoints used by the console
*/

use async_trait::async_trait;

use crate::http::{Result, TaskClient};
use crate::types::{ActionAck, CreateDownloadResponse, DownloadRequest, Task};

/// Remote task service operations consumed by the synchronization engine
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    async fn create_download(&self, req: &DownloadRequest) -> Result<CreateDownloadResponse>;

    async fn pause_task(&self, task_id: &str) -> Result<ActionAck>;

    async fn resume_task(&self, task_id: &str) -> Result<ActionAck>;

    async fn cancel_task(&self, task_id: &str) -> Result<ActionAck>;

    async fn open_folder(&self, path: &str) -> Result<ActionAck>;
}

#[async_trait]
impl TaskService for TaskClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        TaskClient::list_tasks(self).await
    }

    async fn create_download(&self, req: &DownloadRequest) -> Result<CreateDownloadResponse> {
        TaskClient::create_download(self, req).await
    }

    async fn pause_task(&self, task_id: &str) -> Result<ActionAck> {
        TaskClient::pause_task(self, task_id).await
    }

    async fn resume_task(&self, task_id: &str) -> Result<ActionAck> {
        TaskClient::resume_task(self, task_id).await
    }

    async fn cancel_task(&self, task_id: &str) -> Result<ActionAck> {
        TaskClient::cancel_task(self, task_id).await
    }

    async fn open_folder(&self, path: &str) -> Result<ActionAck> {
        TaskClient::open_folder(self, path).await
    }
}
