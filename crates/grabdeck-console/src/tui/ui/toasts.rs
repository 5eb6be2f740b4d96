/*
[INPUT]:  Live toasts from the Notifier
[OUTPUT]: Toast stack drawn in the top-right corner
[POS]:    TUI UI notification overlay
[UPDATE]: When toast styling changes
*/

use grabdeck_console::Severity;
use grabdeck_console::format::truncate_to_width;
use grabdeck_console::notify::{Notifier, ToastPhase};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tokio::time::Instant;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Success => Color::LightGreen,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::LightRed,
    }
}

pub(in crate::tui) fn draw_toasts(frame: &mut ratatui::Frame, area: Rect, notifier: &Notifier) {
    let width = TOAST_WIDTH.min(area.width);
    let inner_width = width.saturating_sub(2) as usize;
    let mut y = area.y;

    // newest on top
    let toasts: Vec<_> = notifier.visible(Instant::now()).collect();
    for (toast, phase) in toasts.into_iter().rev() {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + area.width - width, y, width, TOAST_HEIGHT);
        let color = severity_color(toast.notification.severity);
        let mut style = Style::default().fg(color);
        if phase == ToastPhase::Exiting {
            style = style.add_modifier(Modifier::DIM);
        }

        let message = truncate_to_width(&toast.notification.message, inner_width);
        let widget = Paragraph::new(Line::from(Span::styled(message, style))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(toast.notification.severity.as_str()),
        );
        frame.render_widget(Clear, rect);
        frame.render_widget(widget, rect);
        y += TOAST_HEIGHT;
    }
}
