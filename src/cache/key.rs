//! Cache key derivation for APOD requests

use std::fmt;

/// Key under which a picture is cached
///
/// "Today" is its own variant, so it never collides with an explicit date,
/// not even one equal to today's date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// No date was requested
    Today,
    /// An explicit, unvalidated date string
    Date(String),
}

impl CacheKey {
    /// Derives the key for a request's `date` parameter
    ///
    /// Absent, empty and whitespace-only values all mean "today".
    pub fn for_date(date: Option<&str>) -> Self {
        match date.map(str::trim) {
            Some(d) if !d.is_empty() => CacheKey::Date(d.to_string()),
            _ => CacheKey::Today,
        }
    }

    /// The date to send upstream, `None` for today
    pub fn upstream_date(&self) -> Option<&str> {
        match self {
            CacheKey::Today => None,
            CacheKey::Date(d) => Some(d),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Today => write!(f, "<today>"),
            CacheKey::Date(d) => write!(f, "{}", d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_absent_and_empty_dates_map_to_today() {
        assert_eq!(CacheKey::for_date(None), CacheKey::Today);
        assert_eq!(CacheKey::for_date(Some("")), CacheKey::Today);
        assert_eq!(CacheKey::for_date(Some("  ")), CacheKey::Today);
    }

    #[test]
    fn test_explicit_date_keeps_its_value() {
        let key = CacheKey::for_date(Some("2024-01-01"));
        assert_eq!(key, CacheKey::Date("2024-01-01".to_string()));
        assert_eq!(key.upstream_date(), Some("2024-01-01"));
    }

    #[test]
    fn test_today_and_todays_date_are_distinct() {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_ne!(CacheKey::for_date(None), CacheKey::for_date(Some(&today)));
    }

    #[test]
    fn test_literal_today_string_is_not_the_sentinel() {
        let key = CacheKey::for_date(Some("today"));
        assert_ne!(key, CacheKey::Today);
        assert_eq!(key.upstream_date(), Some("today"));
    }

    #[test]
    fn test_display_for_logging() {
        assert_eq!(CacheKey::Today.to_string(), "<today>");
        assert_eq!(CacheKey::Date("2024-01-01".to_string()).to_string(), "2024-01-01");
        assert_ne!(
            CacheKey::Today.to_string(),
            CacheKey::Date("today".to_string()).to_string()
        );
    }
}
