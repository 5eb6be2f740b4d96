/*
[INPUT]:  Crossterm key codes, AppState, the running engine
[OUTPUT]: Card navigation, action triggers, modal input routing
[POS]:    TUI key handling
[UPDATE]: When keybindings change
*/

use crossterm::event::KeyCode;
use grabdeck_console::dispatch::validate_url;
use grabdeck_console::{ActionKind, Engine};
use tracing::debug;

use super::app::{ActiveModal, AppState, Tab};
use super::cards::CardView;
use super::ui::modal::ModalAction;

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) fn handle_key_event(
    app: &mut AppState,
    engine: &mut Engine<CardView>,
    key: KeyCode,
) -> bool {
    if app.active_modal.is_some() {
        handle_modal_key_event(app, key);
        return false;
    }

    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Tasks),
        KeyCode::Char('2') => app.set_tab(Tab::Logs),
        KeyCode::Char('n') => app.open_new_download(),
        KeyCode::Char('g') => {
            debug!("manual refresh");
            engine.poke_now();
        }
        _ if app.current_tab == Tab::Tasks => handle_task_key(app, engine.view_mut(), key),
        _ => {}
    }
    false
}

fn handle_task_key(app: &mut AppState, view: &mut CardView, key: KeyCode) {
    match key {
        KeyCode::Up => view.move_selection(-1),
        KeyCode::Down => view.move_selection(1),
        KeyCode::Left => view.move_action_focus(-1),
        KeyCode::Right => view.move_action_focus(1),
        KeyCode::Enter => {
            if let Some(card) = view.selected() {
                if let Some(action) = card.focused() {
                    app.trigger(card, action);
                }
            }
        }
        KeyCode::Char(ch) => {
            let action = match ch {
                'p' => ActionKind::Pause,
                'r' => ActionKind::Resume,
                'c' => ActionKind::Cancel,
                'o' => ActionKind::OpenFolder,
                _ => return,
            };
            if let Some(card) = view.selected() {
                app.trigger(card, action);
            }
        }
        _ => {}
    }
}

fn handle_modal_key_event(app: &mut AppState, key: KeyCode) {
    match app.active_modal.take() {
        Some(ActiveModal::NewDownload(mut modal)) => match modal.handle_key(key) {
            ModalAction::Cancel => app.close_modal(),
            ModalAction::Submit => {
                let valid = validate_url(modal.url()).is_ok();
                // invalid input is reported by the dispatcher as a toast
                app.submit_download(modal.url().to_string(), modal.options());
                if valid {
                    app.close_modal();
                } else {
                    app.active_modal = Some(ActiveModal::NewDownload(modal));
                }
            }
            ModalAction::None => app.active_modal = Some(ActiveModal::NewDownload(modal)),
        },
        Some(ActiveModal::Confirm(mut modal)) => match modal.handle_key(key) {
            Some(answer) => {
                modal.answer(answer);
                app.close_modal();
            }
            None => app.active_modal = Some(ActiveModal::Confirm(modal)),
        },
        None => {}
    }
}
