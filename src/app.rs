//! Application state management for the APOD viewer
//!
//! This module contains the viewer state, keyboard handling, and the load
//! bookkeeping that keeps only the latest request's response.

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cli::first_apod_date;
use crate::data::PictureRecord;
use crate::history::HistoryList;
use crate::loader::{LoadMessage, LoadRequest};

/// Message shown when a load fails
pub const LOAD_ERROR_PREFIX: &str = "Failed to load APOD data. Please try again.";

/// Which part of the screen receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The picture panel and date selector
    Picture,
    /// The recently viewed grid
    History,
}

/// Main application struct managing state and data
pub struct App {
    /// Today's local date, the upper bound of the date selector
    pub today: NaiveDate,
    /// Date shown in the selector; `None` means "today" as decided by the server
    pub selected_date: Option<NaiveDate>,
    /// Picture currently displayed
    pub current: Option<PictureRecord>,
    /// A load is in flight
    pub loading: bool,
    /// Message from the last failed load
    pub error: Option<String>,
    /// Recently viewed pictures
    pub history: HistoryList,
    /// Which panel receives navigation keys
    pub focus: Focus,
    /// Selected cell in the history grid
    pub history_cursor: usize,
    /// Enlarged image view is open
    pub show_lightbox: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset of the explanation text
    pub scroll_offset: u16,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Loads requested since the main loop last drained them
    pending_loads: Vec<LoadRequest>,
    next_request_id: u64,
    /// Only the response to this request is applied
    latest_request_id: Option<u64>,
    /// Selection that produced `current`, restored when a load fails
    current_selection: Option<NaiveDate>,
}

impl App {
    /// Creates a new App for the given local date
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            selected_date: None,
            current: None,
            loading: false,
            error: None,
            history: HistoryList::new(),
            focus: Focus::Picture,
            history_cursor: 0,
            show_lightbox: false,
            show_help: false,
            scroll_offset: 0,
            should_quit: false,
            pending_loads: Vec::new(),
            next_request_id: 1,
            latest_request_id: None,
            current_selection: None,
        }
    }

    /// The date the selector currently points at
    pub fn displayed_date(&self) -> NaiveDate {
        self.selected_date.unwrap_or(self.today)
    }

    /// Starts loading `date`, or today's picture when `date` is `None`
    ///
    /// Sets the loading flag, clears the previous error and supersedes any
    /// load still in flight. The returned request is also queued for
    /// [`App::take_pending_loads`].
    pub fn load_for_date(&mut self, date: Option<NaiveDate>) -> LoadRequest {
        let request = LoadRequest {
            id: self.next_request_id,
            date,
        };
        self.next_request_id += 1;
        self.latest_request_id = Some(request.id);

        self.selected_date = date;
        self.loading = true;
        self.error = None;
        self.show_lightbox = false;
        self.scroll_offset = 0;
        self.pending_loads.push(request);

        request
    }

    /// Loads requested since the last call, oldest first
    pub fn take_pending_loads(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.pending_loads)
    }

    /// Applies a finished load
    ///
    /// # Returns
    /// * `true` if the message answered the latest request and was applied
    /// * `false` if it was stale and has been discarded
    pub fn apply_load(&mut self, message: LoadMessage) -> bool {
        if self.latest_request_id != Some(message.request_id) {
            return false;
        }
        self.latest_request_id = None;
        self.loading = false;

        match message.result {
            Ok(record) => {
                self.current_selection = self.selected_date;
                self.current = Some(record.clone());
                self.history.push(record);
                self.history_cursor = 0;
            }
            Err(err) => {
                // The selector goes back to the picture still on screen
                if self.current.is_some() {
                    self.selected_date = self.current_selection;
                }
                self.error = Some(format!("{} ({})", LOAD_ERROR_PREFIX, err));
            }
        }
        true
    }

    /// Shows a history entry without a network call
    ///
    /// Any load still in flight is superseded.
    pub fn select_history(&mut self, index: usize) {
        let Some(record) = self.history.get(index).cloned() else {
            return;
        };

        self.selected_date = Some(record.date);
        self.current_selection = self.selected_date;
        self.current = Some(record);
        self.history_cursor = index;
        self.latest_request_id = None;
        self.loading = false;
        self.error = None;
        self.show_lightbox = false;
        self.scroll_offset = 0;
    }

    /// Loads the day before the selected date, stopping at the first APOD
    pub fn previous_day(&mut self) {
        if let Some(date) = self.displayed_date().pred_opt() {
            if date >= first_apod_date() {
                self.load_for_date(Some(date));
            }
        }
    }

    /// Loads the day after the selected date, never past today
    pub fn next_day(&mut self) {
        if let Some(date) = self.displayed_date().succ_opt() {
            if date <= self.today {
                self.load_for_date(Some(date));
            }
        }
    }

    /// Opens the enlarged view if an image is displayed
    pub fn open_lightbox(&mut self) {
        let is_image = self.current.as_ref().is_some_and(PictureRecord::is_image);
        if is_image && !self.loading {
            self.show_lightbox = true;
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `←`/`h`, `→`/`l`: Previous / next day (history cursor when the grid has focus)
    /// - `t`: Today's picture
    /// - `r`: Reload the selected date
    /// - `Enter`/`o`: Open the enlarged image (select entry when the grid has focus)
    /// - `↑`/`k`, `↓`/`j`: Scroll the explanation
    /// - `Tab`: Switch focus between picture and history
    /// - `1`-`5`: Show a history entry
    /// - `?`: Toggle help
    /// - `q`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Overlays intercept all keys while shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }
        if self.show_lightbox {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('o') | KeyCode::Char('q')
            ) {
                self.show_lightbox = false;
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.select_history(index);
                return;
            }
            KeyCode::Tab => {
                self.toggle_focus();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Picture => match key_event.code {
                KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.previous_day();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.next_day();
                }
                KeyCode::Char('t') => {
                    self.load_for_date(None);
                }
                KeyCode::Char('r') => {
                    self.load_for_date(self.selected_date);
                }
                KeyCode::Enter | KeyCode::Char('o') => {
                    self.open_lightbox();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.scroll_offset = self.scroll_offset.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.scroll_down();
                }
                KeyCode::Char('g') => {
                    self.scroll_offset = 0;
                }
                _ => {}
            },
            Focus::History => match key_event.code {
                KeyCode::Esc => {
                    self.focus = Focus::Picture;
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.move_history_cursor_left();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.move_history_cursor_right();
                }
                KeyCode::Enter => {
                    self.select_history(self.history_cursor);
                    self.focus = Focus::Picture;
                }
                _ => {}
            },
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Picture if !self.history.is_empty() => Focus::History,
            _ => Focus::Picture,
        };
    }

    fn scroll_down(&mut self) {
        // Explanations are a few paragraphs at most
        const MAX_SCROLL: u16 = 200;
        if self.scroll_offset < MAX_SCROLL {
            self.scroll_offset += 1;
        }
    }

    /// Moves the history cursor left, wrapping to the last entry
    fn move_history_cursor_left(&mut self) {
        let count = self.history.len();
        if count == 0 {
            return;
        }
        if self.history_cursor == 0 {
            self.history_cursor = count - 1;
        } else {
            self.history_cursor -= 1;
        }
    }

    /// Moves the history cursor right, wrapping to the first entry
    fn move_history_cursor_right(&mut self) {
        let count = self.history.len();
        if count == 0 {
            return;
        }
        self.history_cursor = (self.history_cursor + 1) % count;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}
