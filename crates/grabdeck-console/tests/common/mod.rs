/*
[INPUT]:  Scripted list responses and action failures
[OUTPUT]: Fake TaskService, recording TaskView and task fixtures
[POS]:    Test infrastructure - shared across console integration tests
[UPDATE]: When TaskService or TaskView gain methods
*/

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use grabdeck_adapter::{
    ActionAck, ClientError, CreateDownloadResponse, DownloadRequest, Result, Task, TaskService,
    TaskStatus,
};
use grabdeck_console::{ActionKind, Confirm, TaskView};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(String),
    Pause(String),
    Resume(String),
    Cancel(String),
    OpenFolder(String),
}

/// One scripted answer to `list_tasks`
pub struct ListReply {
    pub delay: Duration,
    pub outcome: std::result::Result<Vec<Task>, (u16, String)>,
}

impl ListReply {
    pub fn ok(tasks: Vec<Task>) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(tasks),
        }
    }

    pub fn err(code: u16, message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err((code, message.to_string())),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// In-memory service. List replies are consumed in call order; once the
/// script runs out, an empty list is returned.
#[derive(Default)]
pub struct FakeService {
    replies: Mutex<VecDeque<ListReply>>,
    calls: Mutex<Vec<Call>>,
    action_error: Mutex<Option<(u16, String)>>,
}

impl FakeService {
    pub fn new(replies: Vec<ListReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn fail_actions(&self, code: u16, message: &str) {
        *self.action_error.lock().unwrap() = Some((code, message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn action_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::List)
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn ack(&self, status: &str) -> Result<ActionAck> {
        match self.action_error.lock().unwrap().clone() {
            Some((code, message)) => Err(ClientError::Api { code, message }),
            None => Ok(ActionAck {
                status: Some(status.to_string()),
                path: None,
            }),
        }
    }
}

#[async_trait]
impl TaskService for FakeService {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.record(Call::List);
        let reply = self.replies.lock().unwrap().pop_front();
        let Some(reply) = reply else {
            return Ok(Vec::new());
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply
            .outcome
            .map_err(|(code, message)| ClientError::Api { code, message })
    }

    async fn create_download(&self, req: &DownloadRequest) -> Result<CreateDownloadResponse> {
        self.record(Call::Create(req.url.clone()));
        self.ack("started")?;
        Ok(CreateDownloadResponse {
            task_id: "new-task".to_string(),
            status: Some("started".to_string()),
        })
    }

    async fn pause_task(&self, task_id: &str) -> Result<ActionAck> {
        self.record(Call::Pause(task_id.to_string()));
        self.ack("paused")
    }

    async fn resume_task(&self, task_id: &str) -> Result<ActionAck> {
        self.record(Call::Resume(task_id.to_string()));
        self.ack("resumed")
    }

    async fn cancel_task(&self, task_id: &str) -> Result<ActionAck> {
        self.record(Call::Cancel(task_id.to_string()));
        self.ack("cancelled")
    }

    async fn open_folder(&self, path: &str) -> Result<ActionAck> {
        self.record(Call::OpenFolder(path.to_string()));
        self.ack("success")
    }
}

pub struct Decline;

#[async_trait]
impl Confirm for Decline {
    async fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Answers with a fixed reply and keeps every prompt it was shown
pub struct RecordingConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl RecordingConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirm for RecordingConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Create(String),
    Status(String, TaskStatus),
    Details(String),
    Progress(String, f64),
    Transfer(String),
    Actions(String, Vec<ActionKind>),
    Error(String, Option<String>),
    Destroy(String),
    Summary(usize),
}

/// TaskView recording every mutation; entries are kept in display order
#[derive(Debug, Default)]
pub struct RecordingView {
    pub ops: Vec<Op>,
    pub entries: Vec<String>,
}

impl RecordingView {
    pub fn take(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }
}

impl TaskView for RecordingView {
    type Handle = String;

    fn create_entry(&mut self, task: &Task, _actions: &[ActionKind]) -> String {
        self.ops.push(Op::Create(task.id.clone()));
        self.entries.push(task.id.clone());
        task.id.clone()
    }

    fn patch_status(&mut self, handle: &String, task: &Task) {
        self.ops.push(Op::Status(handle.clone(), task.status));
    }

    fn patch_details(&mut self, handle: &String, _task: &Task) {
        self.ops.push(Op::Details(handle.clone()));
    }

    fn patch_progress(&mut self, handle: &String, task: &Task) {
        self.ops
            .push(Op::Progress(handle.clone(), task.progress_percent()));
    }

    fn patch_transfer(&mut self, handle: &String, _task: &Task) {
        self.ops.push(Op::Transfer(handle.clone()));
    }

    fn rebuild_actions(&mut self, handle: &String, _task: &Task, actions: &[ActionKind]) {
        self.ops.push(Op::Actions(handle.clone(), actions.to_vec()));
    }

    fn set_error_panel(&mut self, handle: &String, message: Option<&str>) {
        self.ops
            .push(Op::Error(handle.clone(), message.map(str::to_string)));
    }

    fn destroy_entry(&mut self, handle: String) {
        self.entries.retain(|id| *id != handle);
        self.ops.push(Op::Destroy(handle));
    }

    fn set_summary(&mut self, count: usize) {
        self.ops.push(Op::Summary(count));
    }
}

pub fn task(id: &str, status: TaskStatus, progress: f64) -> Task {
    let mut task = Task::new(id, status);
    task.progress = progress;
    task
}
