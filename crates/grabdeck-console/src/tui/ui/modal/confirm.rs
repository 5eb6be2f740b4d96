/*
[INPUT]:  Confirmation prompts raised by the dispatcher
[OUTPUT]: Yes/No modal answering through a oneshot channel
[POS]:    TUI UI modal - destructive action confirmation
[UPDATE]: When confirmation wording or flow changes
*/

use async_trait::async_trait;
use crossterm::event::KeyCode;
use grabdeck_console::Confirm;
use ratatui::text::Line;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::{Field, Modal, ModalAction, handle_modal_key};

/// Prompt waiting for the user's answer
pub(in crate::tui) struct ConfirmRequest {
    pub(in crate::tui) prompt: String,
    reply: oneshot::Sender<bool>,
}

/// `Confirm` backed by the TUI: each prompt becomes a modal
pub(in crate::tui) struct ModalConfirm {
    requests: mpsc::UnboundedSender<ConfirmRequest>,
}

impl ModalConfirm {
    pub(in crate::tui) fn new(requests: mpsc::UnboundedSender<ConfirmRequest>) -> Self {
        Self { requests }
    }
}

#[async_trait]
impl Confirm for ModalConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        let request = ConfirmRequest {
            prompt: prompt.to_string(),
            reply,
        };
        if self.requests.send(request).is_err() {
            debug!("ui gone, treating confirmation as declined");
            return false;
        }
        // a dropped modal reads as "no"
        answer.await.unwrap_or(false)
    }
}

pub(in crate::tui) struct ConfirmModal {
    request: ConfirmRequest,
    focus_index: usize,
}

impl ConfirmModal {
    pub(in crate::tui) fn new(request: ConfirmRequest) -> Self {
        // focus "No" first
        Self {
            request,
            focus_index: 1,
        }
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        Modal {
            title: String::from("Confirm"),
            focus_index: self.focus_index,
            fields: vec![
                Field::Button {
                    label: String::from("Yes"),
                    action: ModalAction::Submit,
                },
                Field::Button {
                    label: String::from("No"),
                    action: ModalAction::Cancel,
                },
            ],
            hint: Some(Line::from(self.request.prompt.clone())),
        }
    }

    /// Returns the answer once the user made one
    pub(in crate::tui) fn handle_key(&mut self, key: KeyCode) -> Option<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => return Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') => return Some(false),
            _ => {}
        }
        let mut modal = self.to_modal();
        let action = handle_modal_key(&mut modal, key);
        self.focus_index = modal.focus_index;
        match action {
            ModalAction::Submit => Some(true),
            ModalAction::Cancel => Some(false),
            ModalAction::None => None,
        }
    }

    pub(in crate::tui) fn answer(self, yes: bool) {
        let _ = self.request.reply.send(yes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answer_reaches_waiting_caller() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let confirm = ModalConfirm::new(tx);
        let waiting = tokio::spawn(async move { confirm.confirm("Cancel download t-1?").await });

        let request = rx.recv().await.expect("request");
        assert_eq!(request.prompt, "Cancel download t-1?");
        let mut modal = ConfirmModal::new(request);
        assert_eq!(modal.handle_key(KeyCode::Left), None);
        let answer = modal.handle_key(KeyCode::Char('y')).expect("answer");
        modal.answer(answer);

        assert!(waiting.await.expect("join"));
    }

    #[tokio::test]
    async fn enter_on_default_focus_declines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let confirm = ModalConfirm::new(tx);
        let waiting = tokio::spawn(async move { confirm.confirm("Cancel?").await });

        let mut modal = ConfirmModal::new(rx.recv().await.expect("request"));
        let answer = modal.handle_key(KeyCode::Enter).expect("answer");
        modal.answer(answer);
        assert!(!waiting.await.expect("join"));
    }

    #[tokio::test]
    async fn dropped_modal_declines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let confirm = ModalConfirm::new(tx);
        let waiting = tokio::spawn(async move { confirm.confirm("Cancel?").await });

        drop(rx.recv().await.expect("request"));
        assert!(!waiting.await.expect("join"));
    }
}
