/*
[INPUT]:  User intents (start/pause/resume/cancel/open folder), TaskService, Confirm
[OUTPUT]: Service calls, notifications and poll nudges on the engine channel
[POS]:    Sync layer - action dispatch
[UPDATE]: When a new user action or validation rule is added
*/

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use grabdeck_adapter::{ClientError, DownloadOptions, DownloadRequest, TaskService};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use url::Url;

use crate::engine::EngineEvent;
use crate::notify::Notification;

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Input rejected before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("enter a video link")]
    EmptyUrl,

    #[error("enter a valid URL")]
    MalformedUrl,
}

/// Validate and normalize a download link
pub fn validate_url(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    match Url::parse(trimmed) {
        Ok(url) if url.has_host() => Ok(trimmed.to_string()),
        _ => Err(ValidationError::MalformedUrl),
    }
}

/// Result of one user action. Failures have already been reported as
/// notifications by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Created(String),
    Declined,
    Invalid(ValidationError),
    Failed(String),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done | Self::Created(_))
    }
}

/// Asks the user to confirm a destructive action
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything; used for `--yes` and non-interactive callers
pub struct AlwaysConfirm;

#[async_trait]
impl Confirm for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Turns user intents into service calls.
///
/// Never mutates local task state: every issued control call is followed by
/// a poke so the next snapshot shows the result.
#[derive(Clone)]
pub struct Dispatcher {
    service: Arc<dyn TaskService>,
    events: UnboundedSender<EngineEvent>,
    confirm: Arc<dyn Confirm>,
    settle_delay: Duration,
}

impl Dispatcher {
    pub fn new(
        service: Arc<dyn TaskService>,
        events: UnboundedSender<EngineEvent>,
        confirm: Arc<dyn Confirm>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            service,
            events,
            confirm,
            settle_delay,
        }
    }

    pub async fn start(&self, url: &str, options: DownloadOptions) -> ActionOutcome {
        let url = match validate_url(url) {
            Ok(url) => url,
            Err(err) => {
                debug!(error = %err, "download link rejected");
                self.notify(Notification::error(err.to_string()));
                return ActionOutcome::Invalid(err);
            }
        };

        let request = DownloadRequest { url, options };
        match self.service.create_download(&request).await {
            Ok(created) => {
                info!(task_id = %created.task_id, url = %request.url, "download started");
                self.notify(Notification::success("download started"));
                self.poke_after(self.settle_delay);
                ActionOutcome::Created(created.task_id)
            }
            Err(err) => self.failed("start download", None, err),
        }
    }

    pub async fn pause(&self, task_id: &str) -> ActionOutcome {
        let result = self.service.pause_task(task_id).await;
        self.finish_control("pause", "task paused", task_id, result.map(|_| ()))
    }

    pub async fn resume(&self, task_id: &str) -> ActionOutcome {
        let result = self.service.resume_task(task_id).await;
        self.finish_control("resume", "task resumed", task_id, result.map(|_| ()))
    }

    /// Cancel after confirmation; a declined prompt does nothing at all
    pub async fn cancel(&self, task_id: &str) -> ActionOutcome {
        let prompt = format!("Cancel download {task_id}?");
        if !self.confirm.confirm(&prompt).await {
            debug!(task_id = %task_id, "cancel declined");
            return ActionOutcome::Declined;
        }
        let result = self.service.cancel_task(task_id).await;
        self.finish_control("cancel", "task cancelled", task_id, result.map(|_| ()))
    }

    /// Reveal a finished download's folder. Does not poke.
    pub async fn open_folder(&self, path: &str) -> ActionOutcome {
        match self.service.open_folder(path).await {
            Ok(_) => {
                self.notify(Notification::info("folder opened"));
                ActionOutcome::Done
            }
            Err(err) => self.failed("open folder", None, err),
        }
    }

    fn finish_control(
        &self,
        action: &str,
        message: &str,
        task_id: &str,
        result: Result<(), ClientError>,
    ) -> ActionOutcome {
        // issued either way; the next snapshot is the source of truth
        self.poke();
        match result {
            Ok(()) => {
                info!(task_id = %task_id, action = %action, "task action accepted");
                self.notify(Notification::info(message));
                ActionOutcome::Done
            }
            Err(err) => self.failed(action, Some(task_id), err),
        }
    }

    fn failed(&self, action: &str, task_id: Option<&str>, err: ClientError) -> ActionOutcome {
        let message = err.user_message();
        warn!(action = %action, task_id = ?task_id, error = %err, "action failed");
        self.notify(Notification::error(format!("{action} failed: {message}")));
        ActionOutcome::Failed(message)
    }

    fn notify(&self, notification: Notification) {
        let _ = self.events.send(EngineEvent::Notify(notification));
    }

    fn poke(&self) {
        let _ = self.events.send(EngineEvent::Poke);
    }

    fn poke_after(&self, delay: Duration) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(EngineEvent::Poke);
        });
    }
}
