/*
[INPUT]:  Dispatcher, download defaults, log buffer, confirmation requests
[OUTPUT]: AppState helpers for TUI rendering and task control
[POS]:    TUI app state
[UPDATE]: When adding tabs, modals or new card actions
*/

use grabdeck_adapter::DownloadOptions;
use grabdeck_console::{ActionKind, Dispatcher};
use tracing::debug;

use crate::tui::LogBufferHandle;
use crate::tui::cards::Card;
use crate::tui::ui::modal::{ConfirmModal, ConfirmRequest, NewDownloadModal};

pub(super) enum ActiveModal {
    NewDownload(NewDownloadModal),
    Confirm(ConfirmModal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Tab {
    Tasks,
    Logs,
}

pub(super) struct AppState {
    pub(super) dispatcher: Dispatcher,
    pub(super) defaults: DownloadOptions,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) current_tab: Tab,
    pub(super) active_modal: Option<ActiveModal>,
    /// Confirmations that arrived while another modal was open
    pub(super) queued_confirms: Vec<ConfirmRequest>,
}

impl AppState {
    pub(super) fn new(
        dispatcher: Dispatcher,
        defaults: DownloadOptions,
        log_buffer: LogBufferHandle,
    ) -> Self {
        Self {
            dispatcher,
            defaults,
            log_buffer,
            current_tab: Tab::Tasks,
            active_modal: None,
            queued_confirms: Vec::new(),
        }
    }

    pub(super) fn open_new_download(&mut self) {
        if self.active_modal.is_none() {
            self.active_modal = Some(ActiveModal::NewDownload(NewDownloadModal::new(&self.defaults)));
        }
    }

    pub(super) fn open_confirm(&mut self, request: ConfirmRequest) {
        if self.active_modal.is_some() {
            self.queued_confirms.push(request);
        } else {
            self.active_modal = Some(ActiveModal::Confirm(ConfirmModal::new(request)));
        }
    }

    /// Closing a confirm modal without an answer declines it
    pub(super) fn close_modal(&mut self) {
        self.active_modal = None;
        if !self.queued_confirms.is_empty() {
            let request = self.queued_confirms.remove(0);
            self.active_modal = Some(ActiveModal::Confirm(ConfirmModal::new(request)));
        }
    }

    pub(super) fn next_tab(&mut self) {
        self.current_tab = match self.current_tab {
            Tab::Tasks => Tab::Logs,
            Tab::Logs => Tab::Tasks,
        };
    }

    pub(super) fn set_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    /// Run `action` against `card` in the background
    pub(super) fn trigger(&self, card: &Card, action: ActionKind) {
        if !card.actions.contains(&action) {
            debug!(task_id = %card.task_id, action = ?action, "action not offered for this task");
            return;
        }
        let dispatcher = self.dispatcher.clone();
        let task_id = card.task_id.clone();
        match action {
            ActionKind::Pause => {
                tokio::spawn(async move {
                    dispatcher.pause(&task_id).await;
                });
            }
            ActionKind::Resume => {
                tokio::spawn(async move {
                    dispatcher.resume(&task_id).await;
                });
            }
            ActionKind::Cancel => {
                tokio::spawn(async move {
                    dispatcher.cancel(&task_id).await;
                });
            }
            ActionKind::OpenFolder => {
                let Some(path) = card.output_file.clone() else {
                    return;
                };
                tokio::spawn(async move {
                    dispatcher.open_folder(&path).await;
                });
            }
        }
    }

    pub(super) fn submit_download(&self, url: String, options: DownloadOptions) {
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            dispatcher.start(&url, options).await;
        });
    }
}
