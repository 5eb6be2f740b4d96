/*
[INPUT]:  Console configuration, TaskService, shutdown token
[OUTPUT]: Headless sync engine whose view is the log
[POS]:    CLI watch mode
[UPDATE]: When view mutations gain new fields worth logging
*/

use std::sync::Arc;

use grabdeck_adapter::{Task, TaskService};
use grabdeck_console::format::summary_label;
use grabdeck_console::{ActionKind, ConsoleConfig, Engine, TaskView};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// TaskView that reports every mutation as a log line
#[derive(Debug, Default)]
pub struct LogView;

impl TaskView for LogView {
    type Handle = String;

    fn create_entry(&mut self, task: &Task, actions: &[ActionKind]) -> String {
        info!(
            task_id = %task.id,
            status = %task.status,
            progress = task.progress_percent(),
            title = %task.title,
            actions = ?actions,
            "task appeared"
        );
        task.id.clone()
    }

    fn patch_status(&mut self, handle: &String, task: &Task) {
        info!(task_id = %handle, status = %task.status, "status changed");
    }

    fn patch_details(&mut self, handle: &String, task: &Task) {
        info!(task_id = %handle, title = %task.title, file_size = %task.file_size, "details changed");
    }

    fn patch_progress(&mut self, handle: &String, task: &Task) {
        tracing::debug!(task_id = %handle, progress = task.progress_percent(), "progress");
    }

    fn patch_transfer(&mut self, handle: &String, task: &Task) {
        tracing::debug!(task_id = %handle, speed = %task.speed, eta = %task.eta, "transfer");
    }

    fn rebuild_actions(&mut self, handle: &String, _task: &Task, actions: &[ActionKind]) {
        info!(task_id = %handle, actions = ?actions, "actions changed");
    }

    fn set_error_panel(&mut self, handle: &String, message: Option<&str>) {
        match message {
            Some(message) => info!(task_id = %handle, error = %message, "task error"),
            None => info!(task_id = %handle, "task error cleared"),
        }
    }

    fn destroy_entry(&mut self, handle: String) {
        info!(task_id = %handle, "task gone");
    }

    fn set_summary(&mut self, count: usize) {
        info!(count, "{}", summary_label(count));
    }
}

pub async fn run_watch(
    config: ConsoleConfig,
    service: Arc<dyn TaskService>,
    shutdown: CancellationToken,
) {
    info!(
        base_url = %config.server.base_url,
        poll_interval_ms = config.sync.poll_interval_ms,
        "watching tasks"
    );
    let mut engine = Engine::new(service, LogView, &config);
    engine.run(shutdown).await;
}
