//! Recently viewed grid
//!
//! One cell per history entry, most recent first. The cell under the cursor is
//! highlighted while the grid has focus.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::data::MediaType;
use crate::history::HISTORY_CAPACITY;

/// Renders the recently viewed grid
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::History;
    let block = Block::default()
        .title(" Recently Viewed ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty = Paragraph::new("Nothing viewed yet")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, HISTORY_CAPACITY as u32); HISTORY_CAPACITY])
        .split(inner);

    let shown = app
        .current
        .as_ref()
        .and_then(|current| app.history.position(current.date));

    for (index, (record, cell)) in app.history.iter().zip(cells.iter()).enumerate() {
        let selected = focused && index == app.history_cursor;
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let marker = match record.media_type {
            MediaType::Image => "",
            MediaType::Video => " [video]",
        };

        let on_screen = if shown == Some(index) { " *" } else { "" };

        let lines = vec![
            Line::from(Span::styled(
                format!("{} {}{}", index + 1, record.date.format("%Y-%m-%d"), on_screen),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(Span::styled(format!("{}{}", record.title, marker), style)),
        ];

        frame.render_widget(Paragraph::new(lines), *cell);
    }
}
