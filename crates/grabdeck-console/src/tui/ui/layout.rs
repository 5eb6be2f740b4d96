/*
[INPUT]:  Current tab, card summary, last sync time
[OUTPUT]: Header, tab bar and hotkey footer
[POS]:    TUI UI frame chrome
[UPDATE]: When hotkeys or header contents change
*/

use chrono::{DateTime, Local};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

use grabdeck_console::format::summary_label;

use crate::tui::app::Tab;
use crate::tui::runtime::{border_style, header_style};

pub(in crate::tui) fn draw_header(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    summary: Option<usize>,
    last_sync: Option<DateTime<Local>>,
    poll_failures: u64,
) {
    let count = match summary {
        None => Span::styled("loading…", Style::default().fg(Color::DarkGray)),
        Some(0) => Span::styled(
            "No downloads yet - press [n] to add one",
            Style::default().fg(Color::DarkGray),
        ),
        Some(n) => Span::styled(summary_label(n), Style::default().add_modifier(Modifier::BOLD)),
    };
    let synced = match last_sync {
        Some(at) => format!("  synced {}", at.format("%H:%M:%S")),
        None => "  not synced".to_string(),
    };
    let mut spans = vec![count, Span::raw(synced)];
    if poll_failures > 0 {
        spans.push(Span::styled(
            format!("  poll failures: {poll_failures}"),
            Style::default().fg(Color::LightRed),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("grabdeck"),
    );
    frame.render_widget(widget, area);
}

pub(in crate::tui) fn draw_tabs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    current_tab: Tab,
) {
    let titles = vec![Line::from("Tasks"), Line::from("Logs")];
    let selected = match current_tab {
        Tab::Tasks => 0,
        Tab::Logs => 1,
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Tabs"),
        )
        .highlight_style(header_style())
        .select(selected);

    frame.render_widget(tabs, area);
}

pub(in crate::tui) fn draw_footer(frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let line1 = Line::from(vec![
        Span::styled("[Up/Down]", key_style),
        Span::raw(" Select  "),
        Span::styled("[Left/Right]", key_style),
        Span::raw(" Action  "),
        Span::styled("[Enter]", key_style),
        Span::raw(" Run  "),
        Span::styled("[n]", key_style),
        Span::raw(" New  "),
        Span::styled("[g]", key_style),
        Span::raw(" Refresh"),
    ]);
    let line2 = Line::from(vec![
        Span::styled("[p]", key_style),
        Span::raw(" Pause  "),
        Span::styled("[r]", key_style),
        Span::raw(" Resume  "),
        Span::styled("[c]", key_style),
        Span::raw(" Cancel  "),
        Span::styled("[o]", key_style),
        Span::raw(" Open folder  "),
        Span::styled("[Tab/1/2]", key_style),
        Span::raw(" Tabs  "),
        Span::styled("[q]", key_style),
        Span::raw(" Quit"),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Hotkeys");
    let text = Text::from(vec![line1, line2]);
    let widget = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}
