//! Recently viewed pictures
//!
//! A short most-recent-first list kept by the viewer for the session. Entries
//! are unique by date: viewing a date again moves it to the front.

use chrono::NaiveDate;

use crate::data::PictureRecord;

/// Maximum number of entries kept
pub const HISTORY_CAPACITY: usize = 5;

/// Bounded, date-deduplicated recency list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryList {
    entries: Vec<PictureRecord>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` at the front
    ///
    /// Any existing entry with the same date is removed first, and the list is
    /// truncated to [`HISTORY_CAPACITY`].
    pub fn push(&mut self, record: PictureRecord) {
        self.entries.retain(|entry| entry.date != record.date);
        self.entries.insert(0, record);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn get(&self, index: usize) -> Option<&PictureRecord> {
        self.entries.get(index)
    }

    /// Position of the entry for `date`, if any
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.entries.iter().position(|entry| entry.date == date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PictureRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
