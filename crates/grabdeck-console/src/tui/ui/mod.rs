/*
[INPUT]:  TUI app state, card view and notifier for UI components
[OUTPUT]: UI component render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: When a panel is added or moved
*/

mod cards;
mod layout;
mod logs;
mod toasts;

pub mod modal;

pub(in crate::tui) use cards::draw_cards;
pub(in crate::tui) use layout::{draw_footer, draw_header, draw_tabs};
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use toasts::draw_toasts;
