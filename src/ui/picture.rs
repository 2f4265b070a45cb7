//! Picture screen rendering
//!
//! Renders the date selector, the current picture's metadata and media frame,
//! its explanation, and the key hint line.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::cli::first_apod_date;
use crate::data::{MediaType, PictureRecord};

/// Icon shown next to the media frame title
fn media_icon(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Image => "\u{1F5BC}", // 🖼
        MediaType::Video => "\u{1F3AC}", // 🎬
    }
}

/// Style for a selector arrow, dimmed when the bound is reached
fn arrow_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Renders the title and the date selector
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let date = app.displayed_date();
    let can_go_back = date > first_apod_date();
    let can_go_forward = date < app.today;

    let label = match app.selected_date {
        None => format!("{} (today)", date.format("%Y-%m-%d")),
        Some(d) => d.format("%Y-%m-%d").to_string(),
    };

    let selector = Line::from(vec![
        Span::styled("\u{25C0} ", arrow_style(can_go_back)),
        Span::styled(
            label,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" \u{25B6}", arrow_style(can_go_forward)),
    ]);

    let block = Block::default()
        .title(" NASA Astronomy Picture of the Day ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(selector)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Renders the picture panel
///
/// While a load is in flight the previous picture is hidden. A failed load
/// shows its message above the picture that was displayed before.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.focus == Focus::Picture {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.loading {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    let (error_area, content_area) = match &app.error {
        Some(_) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2), Constraint::Min(0)])
                .split(inner);
            (Some(chunks[0]), chunks[1])
        }
        None => (None, inner),
    };

    if let (Some(message), Some(error_area)) = (&app.error, error_area) {
        let error = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(error, error_area);
    }

    match &app.current {
        Some(record) => render_record(frame, app, record, content_area),
        None if app.error.is_none() => {
            let empty = Paragraph::new("No picture loaded")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, content_area);
        }
        None => {}
    }
}

fn render_record(frame: &mut Frame, app: &App, record: &PictureRecord, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title and date
            Constraint::Length(3), // Media frame
            Constraint::Min(0),    // Explanation
        ])
        .split(area);

    let mut meta = vec![
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
    ];
    if let Some(copyright) = &record.copyright {
        if let Some(date_line) = meta.last_mut() {
            date_line.spans.push(Span::styled(
                format!("  \u{00A9} {}", copyright),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    frame.render_widget(Paragraph::new(meta), chunks[0]);

    render_media_frame(frame, record, chunks[1]);

    let explanation = Paragraph::new(record.explanation.as_str())
        .wrap(Wrap { trim: true })
        .scroll((app.scroll_offset, 0));
    frame.render_widget(explanation, chunks[2]);
}

/// Renders the frame standing in for the image or the embedded video
fn render_media_frame(frame: &mut Frame, record: &PictureRecord, area: Rect) {
    let (hint, color) = match record.media_type {
        MediaType::Image => ("  [Enter] enlarge", Color::Green),
        MediaType::Video => ("", Color::Magenta),
    };

    let block = Block::default()
        .title(format!(
            " {} {} ",
            media_icon(record.media_type),
            record.media_type.label()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let line = Line::from(vec![
        Span::styled(record.url.clone(), Style::default().fg(Color::Blue)),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Renders the key hint line
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.focus {
        Focus::Picture => "←/→ day  t today  r reload  Enter enlarge  Tab history  ? help  q quit",
        Focus::History => "←/→ move  Enter show  Tab/Esc back  ? help  q quit",
    };

    let footer = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ClientFetchError;
    use crate::loader::LoadMessage;
    use crate::ui::buffer_to_string;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(media_type: MediaType) -> PictureRecord {
        PictureRecord {
            date: ymd(2024, 1, 1),
            title: "Pillars of Creation".to_string(),
            explanation: "Towers of gas and dust in the Eagle Nebula.".to_string(),
            media_type,
            url: "https://apod.nasa.gov/pillars.jpg".to_string(),
            hd_url: None,
            copyright: Some("Jane Doe".to_string()),
        }
    }

    fn app_showing(record: PictureRecord) -> App {
        let mut app = App::new(ymd(2024, 1, 1));
        let request = app.load_for_date(None);
        app.apply_load(LoadMessage {
            request_id: request.id,
            result: Ok(record),
        });
        app
    }

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(90, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    fn draw_header(app: &App) -> String {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_header(frame, app, area);
            })
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn test_image_shows_title_date_explanation_and_enlarge_hint() {
        let content = draw(&app_showing(record(MediaType::Image)));

        assert!(content.contains("Pillars of Creation"));
        assert!(content.contains("2024-01-01"));
        assert!(content.contains("Eagle Nebula"));
        assert!(content.contains("Image"));
        assert!(content.contains("enlarge"));
        assert!(content.contains("Jane Doe"));
    }

    #[test]
    fn test_video_is_framed_without_enlarge_hint() {
        let content = draw(&app_showing(record(MediaType::Video)));

        assert!(content.contains("Video"));
        assert!(content.contains("https://apod.nasa.gov/pillars.jpg"));
        assert!(!content.contains("enlarge"));
    }

    #[test]
    fn test_loading_hides_previous_picture() {
        let mut app = app_showing(record(MediaType::Image));
        app.load_for_date(Some(ymd(2023, 12, 31)));

        let content = draw(&app);

        assert!(content.contains("Loading..."));
        assert!(!content.contains("Pillars of Creation"));
    }

    #[test]
    fn test_error_is_shown_above_previous_picture() {
        let mut app = app_showing(record(MediaType::Image));
        let request = app.load_for_date(Some(ymd(2023, 12, 31)));
        app.apply_load(LoadMessage {
            request_id: request.id,
            result: Err(ClientFetchError::Unreachable("refused".to_string())),
        });

        let content = draw(&app);

        assert!(content.contains("Failed to load APOD data"));
        assert!(content.contains("Pillars of Creation"));
    }

    #[test]
    fn test_empty_state() {
        let app = App::new(ymd(2024, 1, 1));
        assert!(draw(&app).contains("No picture loaded"));
    }

    #[test]
    fn test_header_marks_today() {
        let app = App::new(ymd(2024, 1, 1));
        let content = draw_header(&app);

        assert!(content.contains("2024-01-01 (today)"));
        assert!(content.contains("Astronomy Picture of the Day"));
    }

    #[test]
    fn test_header_shows_explicit_date() {
        let mut app = App::new(ymd(2024, 1, 1));
        app.selected_date = Some(ymd(2023, 7, 4));

        let content = draw_header(&app);

        assert!(content.contains("2023-07-04"));
        assert!(!content.contains("(today)"));
    }
}
