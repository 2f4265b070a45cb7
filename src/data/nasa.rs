//! NASA APOD API client
//!
//! This module fetches the Astronomy Picture of the Day from the upstream
//! NASA endpoint and parses it into a [`PictureRecord`]. It also defines the
//! [`ApodSource`] seam the proxy depends on, so the proxy can be exercised
//! against a fake upstream.

use std::fmt;
use std::future::Future;

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use thiserror::Error;

use super::{MediaType, PictureRecord};

/// Default upstream endpoint
pub const NASA_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Errors that can occur when fetching from the upstream provider
///
/// Cloneable so a single failed fetch can be handed to every caller that was
/// waiting on it. Messages never include the request URL, which carries the
/// API key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// The upstream did not answer within the configured timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// The upstream answered with a non-success status
    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(String),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// `media_type` is neither image nor video
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::RequestFailed(err.without_url().to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::ParseError(err.to_string())
    }
}

/// Anything that can produce the picture for a date
///
/// `date` is `None` for "today" and is otherwise passed through unvalidated.
pub trait ApodSource: Send + Sync + 'static {
    fn fetch_apod(
        &self,
        date: Option<&str>,
    ) -> impl Future<Output = Result<PictureRecord, UpstreamError>> + Send;
}

/// Raw upstream payload, snake_case as NASA serves it
#[derive(Debug, Deserialize)]
struct NasaApodResponse {
    date: Option<String>,
    title: Option<String>,
    explanation: Option<String>,
    media_type: Option<String>,
    url: Option<String>,
    hdurl: Option<String>,
    copyright: Option<String>,
}

/// Client for the NASA APOD endpoint
#[derive(Clone)]
pub struct NasaClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for NasaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NasaClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NasaClient {
    /// Creates a client for the public NASA endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: NASA_APOD_URL.to_string(),
        }
    }

    /// Points the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_request(&self, date: Option<&str>) -> RequestBuilder {
        let request = self
            .http_client
            .get(&self.base_url)
            .query(&[("api_key", self.api_key.as_str())]);

        match date {
            Some(date) => request.query(&[("date", date)]),
            None => request,
        }
    }

    /// Fetches the picture for `date`, or today's when `date` is `None`
    ///
    /// # Returns
    /// * `Ok(PictureRecord)` - The parsed picture
    /// * `Err(UpstreamError)` - Transport failure, non-2xx status or malformed payload
    pub async fn fetch_picture(&self, date: Option<&str>) -> Result<PictureRecord, UpstreamError> {
        let response = self.build_request(date).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_response(&text)
    }
}

impl ApodSource for NasaClient {
    fn fetch_apod(
        &self,
        date: Option<&str>,
    ) -> impl Future<Output = Result<PictureRecord, UpstreamError>> + Send {
        self.fetch_picture(date)
    }
}

/// Parses an upstream JSON body into a [`PictureRecord`]
///
/// `hdurl` is kept for images only.
pub fn parse_response(text: &str) -> Result<PictureRecord, UpstreamError> {
    let raw: NasaApodResponse = serde_json::from_str(text)?;

    let date_str = required(raw.date, "date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| UpstreamError::ParseError(format!("Invalid date '{}': {}", date_str, e)))?;

    let media_str = required(raw.media_type, "media_type")?;
    let media_type = MediaType::parse(&media_str)
        .ok_or(UpstreamError::UnsupportedMediaType(media_str))?;

    let hd_url = match media_type {
        MediaType::Image => raw.hdurl.filter(|u| !u.is_empty()),
        MediaType::Video => None,
    };

    Ok(PictureRecord {
        date,
        title: required(raw.title, "title")?,
        explanation: raw.explanation.unwrap_or_default(),
        media_type,
        url: required(raw.url, "url")?,
        hd_url,
        copyright: raw.copyright.map(|c| c.trim().to_string()),
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, UpstreamError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| UpstreamError::MissingField(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_RESPONSE: &str = r#"{
        "copyright": "\nJane Doe\n",
        "date": "2024-01-01",
        "explanation": "A spiral galaxy.",
        "hdurl": "https://apod.nasa.gov/apod/image/2401/galaxy_big.jpg",
        "media_type": "image",
        "service_version": "v1",
        "title": "X",
        "url": "https://apod.nasa.gov/apod/image/2401/galaxy.jpg"
    }"#;

    const VIDEO_RESPONSE: &str = r#"{
        "date": "2024-02-02",
        "explanation": "A comet passes.",
        "hdurl": "https://example.invalid/ignored",
        "media_type": "video",
        "title": "Comet",
        "url": "https://www.youtube.com/embed/abc"
    }"#;

    #[test]
    fn test_parse_image_response() {
        let record = parse_response(IMAGE_RESPONSE).expect("should parse");

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(record.title, "X");
        assert_eq!(record.media_type, MediaType::Image);
        assert_eq!(record.url, "https://apod.nasa.gov/apod/image/2401/galaxy.jpg");
        assert_eq!(
            record.hd_url.as_deref(),
            Some("https://apod.nasa.gov/apod/image/2401/galaxy_big.jpg")
        );
        assert_eq!(record.copyright.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_parse_video_drops_hd_url() {
        let record = parse_response(VIDEO_RESPONSE).expect("should parse");

        assert_eq!(record.media_type, MediaType::Video);
        assert!(record.hd_url.is_none());
    }

    #[test]
    fn test_parse_minimal_image_without_explanation() {
        let json = r#"{"date":"2024-01-01","title":"X","media_type":"image","url":"http://img"}"#;
        let record = parse_response(json).expect("should parse");

        assert_eq!(record.explanation, "");
        assert!(record.hd_url.is_none());
    }

    #[test]
    fn test_parse_missing_title_is_error() {
        let json = r#"{"date":"2024-01-01","media_type":"image","url":"http://img"}"#;
        let err = parse_response(json).unwrap_err();

        assert_eq!(err, UpstreamError::MissingField("title".to_string()));
    }

    #[test]
    fn test_parse_unknown_media_type_is_error() {
        let json = r#"{"date":"2024-01-01","title":"X","media_type":"other","url":"http://x"}"#;
        let err = parse_response(json).unwrap_err();

        assert_eq!(err, UpstreamError::UnsupportedMediaType("other".to_string()));
    }

    #[test]
    fn test_parse_bad_date_is_error() {
        let json = r#"{"date":"01/01/2024","title":"X","media_type":"image","url":"http://x"}"#;
        let err = parse_response(json).unwrap_err();

        assert!(matches!(err, UpstreamError::ParseError(_)));
    }

    #[test]
    fn test_parse_malformed_json_is_error() {
        let err = parse_response("<html>Too Many Requests</html>").unwrap_err();
        assert!(matches!(err, UpstreamError::ParseError(_)));
    }

    #[test]
    fn test_request_without_date_only_sends_key() {
        let client = NasaClient::new("secret").with_base_url("http://localhost:9/apod");
        let request = client.build_request(None).build().unwrap();

        assert_eq!(request.url().path(), "/apod");
        assert_eq!(request.url().query(), Some("api_key=secret"));
    }

    #[test]
    fn test_request_with_date_sends_date() {
        let client = NasaClient::new("secret").with_base_url("http://localhost:9/apod");
        let request = client.build_request(Some("2024-01-01")).build().unwrap();

        assert_eq!(request.url().query(), Some("api_key=secret&date=2024-01-01"));
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let client = NasaClient::new("super-secret-key");
        let debug = format!("{:?}", client);

        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(UpstreamError::Status(429).to_string(), "Upstream returned HTTP 429");
    }
}
