//! UI rendering module for the APOD viewer
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod history_grid;
pub mod lightbox;
pub mod picture;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::App;

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with date selector
            Constraint::Min(8),    // Picture
            Constraint::Length(6), // Recently viewed
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    picture::render_header(frame, app, chunks[0]);
    picture::render(frame, app, chunks[1]);
    history_grid::render(frame, app, chunks[2]);
    picture::render_footer(frame, app, chunks[3]);

    if app.show_lightbox {
        lightbox::render(frame, app);
    }
    if app.show_help {
        help_overlay::render(frame);
    }
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Flattens a rendered buffer into a string for assertions
#[cfg(test)]
pub(crate) fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MediaType, PictureRecord};
    use crate::loader::LoadMessage;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_app(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    fn loaded_app() -> App {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut app = App::new(date);
        let request = app.load_for_date(None);
        app.apply_load(LoadMessage {
            request_id: request.id,
            result: Ok(PictureRecord {
                date,
                title: "Horsehead Nebula".to_string(),
                explanation: "Dark dust.".to_string(),
                media_type: MediaType::Image,
                url: "http://img".to_string(),
                hd_url: Some("http://img/hd".to_string()),
                copyright: None,
            }),
        });
        app
    }

    #[test]
    fn test_full_screen_renders_all_sections() {
        let content = render_app(&loaded_app());

        assert!(content.contains("Astronomy Picture of the Day"));
        assert!(content.contains("Horsehead Nebula"));
        assert!(content.contains("Recently Viewed"));
    }

    #[test]
    fn test_overlays_render_on_top() {
        let mut app = loaded_app();
        app.show_lightbox = true;
        assert!(render_app(&app).contains("http://img/hd"));

        app.show_lightbox = false;
        app.show_help = true;
        assert!(render_app(&app).contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let backend = TestBackend::new(10, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = loaded_app();

        terminal.draw(|frame| render(frame, &app)).unwrap();
    }

    #[test]
    fn test_centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(50, 20, area);

        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 20);
        assert_eq!(rect.x, 15);
        assert_eq!(rect.y, 2);
    }
}
