/*
[INPUT]:  Modal state, fields, and key events
[OUTPUT]: Modal rendering output and modal action results
[POS]:    TUI UI modal module root
[UPDATE]: When a new field kind or modal is added
*/

mod confirm;
mod new_download;

pub(in crate::tui) use confirm::{ConfirmModal, ConfirmRequest, ModalConfirm};
pub(in crate::tui) use new_download::NewDownloadModal;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::runtime::border_style;

pub(in crate::tui) struct Modal {
    pub(super) title: String,
    pub(super) focus_index: usize,
    pub(super) fields: Vec<Field>,
    /// Read-only lines shown under the fields
    pub(super) hint: Option<Line<'static>>,
}

pub(in crate::tui) enum Field {
    TextInput {
        label: String,
        value: String,
    },
    Select {
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    Toggle {
        label: String,
        value: bool,
    },
    Button {
        label: String,
        action: ModalAction,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui) enum ModalAction {
    Submit,
    Cancel,
    None,
}

/// Centered rectangle of `width` columns by `height` rows inside `area`
pub(in crate::tui) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}

pub(in crate::tui) fn draw_modal(frame: &mut ratatui::Frame, area: Rect, modal: &Modal) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(modal.title.as_str());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = modal
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let content = match field {
                Field::TextInput { label, value } => format!("{label}: {value}"),
                Field::Select {
                    label,
                    options,
                    selected,
                } => {
                    let selected_value = options.get(*selected).map(String::as_str).unwrap_or("-");
                    format!("{label}: < {selected_value} >")
                }
                Field::Toggle { label, value } => {
                    format!("{label}: [{}]", if *value { "x" } else { " " })
                }
                Field::Button { label, .. } => format!("[{label}]"),
            };
            let style = if index == modal.focus_index {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(content, style))
        })
        .collect();

    if let Some(hint) = &modal.hint {
        lines.push(Line::default());
        lines.push(hint.clone());
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

pub(in crate::tui) fn handle_modal_key(modal: &mut Modal, key: KeyCode) -> ModalAction {
    match key {
        KeyCode::Esc => ModalAction::Cancel,
        KeyCode::Tab | KeyCode::Down => {
            if !modal.fields.is_empty() {
                modal.focus_index = (modal.focus_index + 1) % modal.fields.len();
            }
            ModalAction::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            if !modal.fields.is_empty() {
                modal.focus_index =
                    (modal.focus_index + modal.fields.len() - 1) % modal.fields.len();
            }
            ModalAction::None
        }
        KeyCode::Left => {
            if let Some(Field::Select { selected, .. }) = modal.fields.get_mut(modal.focus_index) {
                *selected = selected.saturating_sub(1);
            }
            ModalAction::None
        }
        KeyCode::Right => {
            if let Some(Field::Select {
                selected, options, ..
            }) = modal.fields.get_mut(modal.focus_index)
            {
                if *selected + 1 < options.len() {
                    *selected += 1;
                }
            }
            ModalAction::None
        }
        KeyCode::Backspace => {
            if let Some(Field::TextInput { value, .. }) = modal.fields.get_mut(modal.focus_index) {
                value.pop();
            }
            ModalAction::None
        }
        KeyCode::Char(ch) => {
            match modal.fields.get_mut(modal.focus_index) {
                Some(Field::TextInput { value, .. }) => value.push(ch),
                Some(Field::Toggle { value, .. }) if ch == ' ' => *value = !*value,
                _ => {}
            }
            ModalAction::None
        }
        KeyCode::Enter => match modal.fields.get_mut(modal.focus_index) {
            Some(Field::Button { action, .. }) => *action,
            Some(Field::Toggle { value, .. }) => {
                *value = !*value;
                ModalAction::None
            }
            // Enter in a text field submits the form
            Some(Field::TextInput { .. }) => ModalAction::Submit,
            _ => ModalAction::None,
        },
        _ => ModalAction::None,
    }
}
