/*
[INPUT]:  Parsed CLI subcommands, TaskService, TaskClient
[OUTPUT]: One-shot task listing, link detection and control commands printed to stdout
[POS]:    CLI command layer
[UPDATE]: When adding a subcommand that talks to the service
*/

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use console::style;
use dialoguer::theme::ColorfulTheme;
use grabdeck_adapter::{DetectResponse, DownloadOptions, Task, TaskClient, TaskService};
use grabdeck_console::dispatch::validate_url;
use grabdeck_console::format::{
    Platform, format_duration, format_file_size, or_dash, status_icon, status_text,
    summary_label, truncate_to_width,
};
use grabdeck_console::{
    ActionOutcome, AlwaysConfirm, Confirm, Dispatcher, EngineEvent, Notification, Severity,
};
use tokio::sync::mpsc;
use tracing::warn;

/// Terminal prompt via dialoguer, run off the async runtime
pub struct DialoguerConfirm;

#[async_trait]
impl Confirm for DialoguerConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;
        match answer {
            Ok(Ok(answer)) => answer,
            Ok(Err(err)) => {
                warn!(error = %err, "confirmation prompt failed");
                false
            }
            Err(err) => {
                warn!(error = %err, "confirmation prompt task failed");
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ControlAction {
    Pause,
    Resume,
    Cancel,
}

pub async fn run_list(service: Arc<dyn TaskService>) -> Result<()> {
    let tasks = service.list_tasks().await.context("list tasks")?;
    println!("{}", style(list_heading(&tasks)).bold());
    if tasks.is_empty() {
        return Ok(());
    }

    println!(
        "{}",
        style(format!(
            "{:<36}  {:<14}  {:>6}  {:>12}  {:>8}  {}",
            "ID", "STATUS", "PROG", "SPEED", "ETA", "TITLE"
        ))
        .dim()
    );
    for task in &tasks {
        let status = format!("{} {}", status_icon(task.status), status_text(task.status));
        let title = if task.title.is_empty() {
            task.url.as_deref().unwrap_or("-")
        } else {
            task.title.as_str()
        };
        println!(
            "{:<36}  {:<14}  {:>5.1}%  {:>12}  {:>8}  {}",
            task.id,
            status,
            task.progress_percent(),
            or_dash(&task.speed),
            or_dash(&task.eta),
            truncate_to_width(title, 48)
        );
        if let Some(error) = &task.error_message {
            println!("{:<36}  {}", "", style(error).red());
        }
    }
    Ok(())
}

/// `3 tasks, 1 active`
fn list_heading(tasks: &[Task]) -> String {
    let active = tasks.iter().filter(|task| !task.status.is_terminal()).count();
    if tasks.is_empty() {
        summary_label(0)
    } else {
        format!("{}, {active} active", summary_label(tasks.len()))
    }
}

/// Show what the service knows about a link without starting a download
pub async fn run_detect(client: &TaskClient, url: &str) -> Result<()> {
    let url = validate_url(url)?;
    let detected = client.detect(&url).await.context("detect link")?;
    for (label, value) in detect_rows(&url, &detected) {
        println!("{:<9} {}", style(label).dim(), value);
    }
    if Platform::detect(&url) == Platform::Unknown {
        print_notification(&Notification::warning(
            "site not recognized, the download may still work",
        ));
    }
    Ok(())
}

fn detect_rows(url: &str, detected: &DetectResponse) -> Vec<(&'static str, String)> {
    let platform = if detected.platform.trim().is_empty() {
        Platform::detect(url).to_string()
    } else {
        detected.platform.clone()
    };
    let info = &detected.info;
    let mut rows = vec![
        ("platform", platform),
        ("title", or_dash(&info.title).to_string()),
        ("duration", format_duration(info.duration_secs())),
        ("size", format_file_size(info.filesize_bytes())),
    ];
    if let Some(thumbnail) = &info.thumbnail {
        rows.push(("thumbnail", thumbnail.clone()));
    }
    rows
}

pub async fn run_add(
    service: Arc<dyn TaskService>,
    url: &str,
    options: DownloadOptions,
) -> Result<()> {
    let (dispatcher, mut events) = one_shot_dispatcher(service, Arc::new(AlwaysConfirm));
    let outcome = dispatcher.start(url, options).await;
    drain_notifications(&mut events);
    match outcome {
        ActionOutcome::Created(task_id) => {
            println!("task id: {}", style(task_id).cyan());
            Ok(())
        }
        other => finish(other),
    }
}

pub async fn run_control(
    service: Arc<dyn TaskService>,
    action: ControlAction,
    task_id: &str,
    assume_yes: bool,
) -> Result<()> {
    let confirm: Arc<dyn Confirm> = if assume_yes {
        Arc::new(AlwaysConfirm)
    } else {
        Arc::new(DialoguerConfirm)
    };
    let (dispatcher, mut events) = one_shot_dispatcher(service, confirm);
    let outcome = match action {
        ControlAction::Pause => dispatcher.pause(task_id).await,
        ControlAction::Resume => dispatcher.resume(task_id).await,
        ControlAction::Cancel => dispatcher.cancel(task_id).await,
    };
    drain_notifications(&mut events);
    finish(outcome)
}

/// Dispatcher without an engine; pokes are simply discarded
fn one_shot_dispatcher(
    service: Arc<dyn TaskService>,
    confirm: Arc<dyn Confirm>,
) -> (Dispatcher, mpsc::UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Dispatcher::new(service, tx, confirm, Duration::ZERO), rx)
}

fn drain_notifications(events: &mut mpsc::UnboundedReceiver<EngineEvent>) {
    while let Ok(event) = events.try_recv() {
        if let EngineEvent::Notify(notification) = event {
            print_notification(&notification);
        }
    }
}

fn print_notification(notification: &Notification) {
    let label = match notification.severity {
        Severity::Info => style("info").cyan(),
        Severity::Success => style("ok").green(),
        Severity::Warning => style("warn").yellow(),
        Severity::Error => style("error").red(),
    };
    println!("[{}] {}", label.bold(), notification.message);
}

fn finish(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Done | ActionOutcome::Created(_) => Ok(()),
        ActionOutcome::Declined => {
            println!("{}", style("nothing changed").dim());
            Ok(())
        }
        ActionOutcome::Invalid(err) => bail!("{err}"),
        ActionOutcome::Failed(message) => bail!("{message}"),
    }
}
