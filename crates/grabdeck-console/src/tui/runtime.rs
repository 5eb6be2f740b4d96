/*
[INPUT]:  Console configuration, TaskService, log buffer, shutdown token
[OUTPUT]: Ratatui-based TUI run loop, rendering, and log buffer utilities
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use grabdeck_adapter::TaskService;
use grabdeck_console::{ConsoleConfig, Engine};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;

use super::app::{ActiveModal, AppState, Tab};
use super::cards::CardView;
use super::events::handle_key_event;
use super::terminal::TerminalGuard;
use super::ui::modal::{ConfirmRequest, ModalConfirm, centered_rect, draw_modal};
use super::ui::*;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub(crate) const LOG_BUFFER_CAPACITY: usize = 2000;

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Last `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// `MakeWriter` feeding formatted log lines into a `LogBuffer`
#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl LogWriter {
    fn push(&self, line: String) {
        let mut guard = match self.buffer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push_line(line);
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = String::from_utf8_lossy(buf);
        self.partial.push_str(&chunk);
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            self.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push(line);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

enum UiEvent {
    Input(CrosstermEvent),
}

enum Wake {
    Engine,
    Ui(UiEvent),
    Confirm(ConfirmRequest),
    Tick,
    Shutdown,
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub async fn run_tui(
    config: ConsoleConfig,
    service: Arc<dyn TaskService>,
    log_buffer: LogBufferHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    if event_tx.send(UiEvent::Input(event)).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let (confirm_tx, mut confirm_rx) = mpsc::unbounded_channel();
    let mut engine = Engine::new(service, CardView::new(), &config);
    let dispatcher = engine.dispatcher(Arc::new(ModalConfirm::new(confirm_tx)));
    let mut app = AppState::new(dispatcher, config.defaults.clone(), log_buffer);
    info!(base_url = %config.server.base_url, "terminal ui started");

    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut should_quit = false;

    while !should_quit {
        terminal.draw(|frame| draw_ui(frame, &app, &engine))?;

        let wake = tokio::select! {
            _ = shutdown.cancelled() => Wake::Shutdown,
            _ = engine.step() => Wake::Engine,
            Some(event) = event_rx.recv() => Wake::Ui(event),
            Some(request) = confirm_rx.recv() => Wake::Confirm(request),
            _ = tick.tick() => Wake::Tick,
        };

        match wake {
            Wake::Shutdown => should_quit = true,
            Wake::Engine => {}
            Wake::Ui(UiEvent::Input(CrosstermEvent::Key(key))) => {
                if key.kind == KeyEventKind::Press
                    && handle_key_event(&mut app, &mut engine, key.code)
                {
                    should_quit = true;
                }
            }
            Wake::Ui(UiEvent::Input(_)) => {}
            Wake::Confirm(request) => app.open_confirm(request),
            Wake::Tick => {
                engine.notifier_mut().prune(Instant::now());
            }
        }
    }

    engine.shutdown();
    input_shutdown.cancel();
    info!("terminal ui stopped");
    Ok(())
}

fn draw_ui(frame: &mut ratatui::Frame, app: &AppState, engine: &Engine<CardView>) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(area);

    draw_header(
        frame,
        layout[0],
        engine.view().summary(),
        engine.last_sync(),
        engine.poll_failures(),
    );

    match app.current_tab {
        Tab::Tasks => draw_cards(frame, layout[1], engine.view()),
        Tab::Logs => draw_logs(frame, layout[1], &app.log_buffer),
    }

    draw_tabs(frame, layout[2], app.current_tab);
    draw_footer(frame, layout[3]);
    draw_toasts(frame, layout[1], engine.notifier());

    if let Some(modal) = &app.active_modal {
        let (model, height) = match modal {
            ActiveModal::NewDownload(modal) => (modal.to_modal(), 12),
            ActiveModal::Confirm(modal) => (modal.to_modal(), 7),
        };
        let rect = centered_rect(area, 64, height);
        draw_modal(frame, rect, &model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_buffer_drops_oldest_past_capacity() {
        let mut buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push_line(format!("line {i}"));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.tail(10), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(buffer.tail(1), vec!["line 4"]);
    }

    #[test]
    fn writer_splits_lines_and_flushes_partial() {
        let handle: LogBufferHandle = Arc::new(StdMutex::new(LogBuffer::new(LOG_BUFFER_CAPACITY)));
        let factory = LogWriterFactory::new(handle.clone());
        {
            let mut writer = factory.make_writer();
            writer.write_all(b"first\r\nsecond\nthi").expect("write");
            writer.write_all(b"rd").expect("write");
        }
        let guard = handle.lock().expect("lock");
        assert_eq!(guard.tail(10), vec!["first", "second", "third"]);
    }
}
