/*
[INPUT]:  LogBufferHandle snapshots for UI
[OUTPUT]: Log panel rendered into Ratatui frame
[POS]:    TUI UI logs panel rendering
[UPDATE]: When log panel layout changes
*/

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::LogBufferHandle;
use crate::tui::runtime::border_style;

pub(in crate::tui) fn draw_logs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    buffer: &LogBufferHandle,
) {
    let available = area.height.saturating_sub(2) as usize;
    let lines = match buffer.lock() {
        Ok(guard) => guard.tail(available),
        Err(poisoned) => poisoned.into_inner().tail(available),
    };

    let text = lines
        .into_iter()
        .map(|line| {
            let style = if line.contains(" WARN ") {
                Style::default().fg(Color::Yellow)
            } else if line.contains(" ERROR ") {
                Style::default().fg(Color::LightRed)
            } else {
                Style::default()
            };
            Line::from(Span::styled(line, style))
        })
        .collect::<Vec<_>>();
    let log_widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Logs"),
    );
    frame.render_widget(log_widget, area);
}
