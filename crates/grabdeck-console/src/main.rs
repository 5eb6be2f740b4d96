/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Terminal UI, headless watcher or one-shot task commands
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod tui;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use grabdeck_adapter::{DownloadOptions, TaskClient, TaskService};
use grabdeck_console::ConsoleConfig;

use crate::cli::commands::{ControlAction, run_add, run_control, run_detect, run_list};
use crate::tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

#[derive(Parser, Debug)]
#[command(name = "grabdeck", version, about = "Console for a remote video download service")]
struct Cli {
    /// Configuration file (defaults to the user config dir)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Also append logs to this file
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
    /// Override server.base_url
    #[arg(long = "server", value_name = "URL", global = true)]
    server: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal UI (default)
    Tui,
    /// Run the sync engine headless and log every change
    Watch,
    /// Print the current task list
    List,
    /// Show platform, title, duration and size for a link
    Detect { url: String },
    /// Start a new download
    Add {
        url: String,
        #[arg(long)]
        quality: Option<String>,
        #[arg(long = "output-dir", value_name = "DIR")]
        output_dir: Option<String>,
        #[arg(long = "no-proxy")]
        no_proxy: bool,
    },
    /// Pause a running download
    Pause { task_id: String },
    /// Resume a paused download
    Resume { task_id: String },
    /// Cancel a download
    Cancel {
        task_id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Write a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let command = args.command.unwrap_or(Command::Tui);

    if let Command::Init { output } = command {
        let output = output
            .or_else(grabdeck_console::config::default_path)
            .context("no config directory; pass --output")?;
        return cli::init::run_init(output);
    }

    let log_buffer: LogBufferHandle = Arc::new(Mutex::new(LogBuffer::new(LOG_BUFFER_CAPACITY)));
    let tui_mode = matches!(command, Command::Tui);
    let _log_guard = init_tracing(&args.log_level, args.log_file.as_ref(), tui_mode, &log_buffer)?;

    let mut config = ConsoleConfig::load(args.config_path.as_deref()).context("load config")?;
    if let Some(server) = args.server {
        config.server.base_url = server;
        config.validate().context("invalid --server")?;
    }
    info!(base_url = %config.server.base_url, "configuration loaded");

    let client = TaskClient::with_config(config.client_config(), &config.server.base_url)
        .map_err(|err| anyhow!(err))
        .context("create service client")?;
    let client = Arc::new(client);
    let service: Arc<dyn TaskService> = client.clone();

    match command {
        Command::Tui => {
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            tui::run_tui(config, service, log_buffer, shutdown).await
        }
        Command::Watch => {
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            cli::watch::run_watch(config, service, shutdown).await;
            Ok(())
        }
        Command::List => run_list(service).await,
        Command::Detect { url } => run_detect(&client, &url).await,
        Command::Add {
            url,
            quality,
            output_dir,
            no_proxy,
        } => {
            let options = DownloadOptions {
                quality: quality.unwrap_or(config.defaults.quality),
                output_dir: output_dir.unwrap_or(config.defaults.output_dir),
                use_proxy: config.defaults.use_proxy && !no_proxy,
            };
            run_add(service, &url, options).await
        }
        Command::Pause { task_id } => {
            run_control(service, ControlAction::Pause, &task_id, true).await
        }
        Command::Resume { task_id } => {
            run_control(service, ControlAction::Resume, &task_id, true).await
        }
        Command::Cancel { task_id, yes } => {
            run_control(service, ControlAction::Cancel, &task_id, yes).await
        }
        Command::Init { .. } => Ok(()),
    }
}

/// TUI mode logs into the in-memory buffer, everything else to stderr.
/// `--log-file` adds a non-blocking file sink in either mode.
fn init_tracing(
    log_level: &str,
    log_file: Option<&PathBuf>,
    tui_mode: bool,
    log_buffer: &LogBufferHandle,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let (file_writer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match (tui_mode, file_writer) {
        (true, Some(file)) => builder
            .with_ansi(false)
            .with_writer(LogWriterFactory::new(log_buffer.clone()).and(file))
            .try_init(),
        (true, None) => builder
            .with_ansi(false)
            .with_writer(LogWriterFactory::new(log_buffer.clone()))
            .try_init(),
        (false, Some(file)) => builder.with_writer(std::io::stderr.and(file)).try_init(),
        (false, None) => builder.with_writer(std::io::stderr).try_init(),
    };
    result
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
