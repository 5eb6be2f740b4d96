/*
[INPUT]:  Console configuration, TaskService, log buffer
[OUTPUT]: Ratatui-based TUI for download cards, logs, and controls
[POS]:    TUI module for the grabdeck binary
[UPDATE]: When adding TUI submodules or changing exports
*/

mod app;
mod cards;
mod events;
mod runtime;
mod terminal;
mod ui;

pub(crate) use runtime::LOG_BUFFER_CAPACITY;
pub use runtime::{LogBuffer, LogBufferHandle, LogWriterFactory, run_tui};
