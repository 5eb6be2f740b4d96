/*
[INPUT]:  Public API exports for grabdeck-console crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod format;
pub mod notify;
pub mod poller;
pub mod reconcile;
pub mod store;
pub mod view;

// Re-export main types for convenience
pub use config::ConsoleConfig;
pub use dispatch::{ActionOutcome, AlwaysConfirm, Confirm, Dispatcher, ValidationError};
pub use engine::{Engine, EngineEvent};
pub use notify::{Notification, Notifier, Severity};
pub use reconcile::{PassStats, Reconciler};
pub use store::{Snapshot, TaskStore};
pub use view::{ActionKind, TaskView, actions_for};
