/*
[INPUT]:  CardView cards and selection
[OUTPUT]: Task cards rendered into Ratatui frame
[POS]:    TUI UI task card list
[UPDATE]: When card layout or styling changes
*/

use grabdeck_adapter::TaskStatus;
use grabdeck_console::ActionKind;
use grabdeck_console::format::{Platform, or_dash, status_icon, status_text, truncate_to_width};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::tui::cards::{Card, CardView};
use crate::tui::runtime::border_style;

fn status_style(status: TaskStatus) -> Style {
    let color = match status {
        TaskStatus::Pending => Color::Gray,
        TaskStatus::Downloading => Color::Cyan,
        TaskStatus::Paused => Color::Yellow,
        TaskStatus::Completed => Color::LightGreen,
        TaskStatus::Failed => Color::LightRed,
        TaskStatus::Cancelled => Color::DarkGray,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn action_label(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Pause => "Pause",
        ActionKind::Resume => "Resume",
        ActionKind::Cancel => "Cancel",
        ActionKind::OpenFolder => "Open folder",
    }
}

fn card_height(card: &Card) -> u16 {
    if card.error.is_some() { 8 } else { 7 }
}

/// First card index to draw so that `selected` is on screen
fn first_visible(cards: &[Card], selected: usize, height: u16) -> usize {
    let mut used = 0u16;
    let mut first = selected;
    for index in (0..=selected).rev() {
        let h = card_height(&cards[index]);
        if used + h > height && index != selected {
            break;
        }
        used += h;
        first = index;
    }
    first
}

pub(in crate::tui) fn draw_cards(frame: &mut ratatui::Frame, area: Rect, view: &CardView) {
    let cards = view.cards();
    if cards.is_empty() {
        let message = match view.summary() {
            None => "Loading tasks…",
            Some(_) => "No downloads. Press [n] to start one.",
        };
        let widget = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style())
                    .title("Tasks"),
            );
        frame.render_widget(widget, area);
        return;
    }

    let selected = view.selected_index().unwrap_or(0);
    let start = first_visible(cards, selected, area.height);
    let mut y = area.y;
    for (index, card) in cards.iter().enumerate().skip(start) {
        let height = card_height(card);
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, height);
        draw_card(frame, rect, card, index == selected);
        y += height;
    }
}

fn draw_card(frame: &mut ratatui::Frame, area: Rect, card: &Card, selected: bool) {
    let border = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        border_style()
    };
    let platform = card
        .url
        .as_deref()
        .map(Platform::detect)
        .unwrap_or(Platform::Unknown);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", platform));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1); 5];
    if card.error.is_some() {
        constraints.push(Constraint::Length(1));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let title = if card.title.trim().is_empty() {
        card.url.clone().unwrap_or_else(|| card.task_id.clone())
    } else {
        card.title.clone()
    };
    let thumb = if card.thumbnail.is_some() { "▣ " } else { "□ " };
    let title_width = (inner.width as usize).saturating_sub(2);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(thumb),
            Span::styled(
                truncate_to_width(&title, title_width),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])),
        rows[0],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} {}", status_icon(card.status), status_text(card.status)),
                status_style(card.status),
            ),
            Span::raw(format!("  size {}", or_dash(&card.file_size))),
        ])),
        rows[1],
    );

    let gauge = Gauge::default()
        .gauge_style(status_style(card.status))
        .ratio(card.progress / 100.0)
        .label(format!("{:.1}%", card.progress));
    frame.render_widget(gauge, rows[2]);

    let mut transfer = format!("speed {}  eta {}", or_dash(&card.speed), or_dash(&card.eta));
    if let Some(done) = &card.downloaded {
        transfer.push_str(&format!("  got {done}"));
    }
    frame.render_widget(
        Paragraph::new(transfer).style(Style::default().fg(Color::Gray)),
        rows[3],
    );

    let mut buttons = Vec::new();
    for (index, action) in card.actions.iter().enumerate() {
        let style = if selected && index == card.focused_action {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::Yellow)
        };
        buttons.push(Span::styled(format!("[{}]", action_label(*action)), style));
        buttons.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(buttons)), rows[4]);

    if let Some(error) = &card.error {
        let width = inner.width as usize;
        frame.render_widget(
            Paragraph::new(truncate_to_width(&format!("! {error}"), width))
                .style(Style::default().fg(Color::LightRed)),
            rows[5],
        );
    }
}
