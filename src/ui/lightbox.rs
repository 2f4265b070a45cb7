//! Enlarged image view
//!
//! A terminal cannot draw the picture itself, so the lightbox shows the title
//! and the highest resolution link available for opening in a browser.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::app::App;

/// Renders the lightbox for the current picture, if there is one
pub fn render(frame: &mut Frame, app: &App) {
    let Some(record) = &app.current else {
        return;
    };

    let area = frame.area();
    let overlay_area = centered_rect(area.width.min(70), area.height.min(9), area);

    frame.render_widget(Clear, overlay_area);

    let mut lines = vec![
        Line::from(Span::styled(
            record.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            record.date.format("%Y-%m-%d").to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            record.large_url().to_string(),
            Style::default().fg(Color::Blue),
        )),
    ];
    if record.hd_url.is_some() {
        lines.push(Line::from(Span::styled(
            "(high resolution)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc to close",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Image ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, overlay_area);
}
