//! Client used by the viewer to talk to the APOD proxy

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::PictureRecord;

/// Default proxy location
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Errors the viewer can hit while loading a picture from the proxy
#[derive(Debug, Error)]
pub enum ClientFetchError {
    /// The proxy could not be reached
    #[error("Could not reach the APOD server: {0}")]
    Unreachable(String),

    /// The proxy answered with an error status
    #[error("APOD server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The proxy answered 2xx but the body was not a picture
    #[error("Unexpected response from the APOD server: {0}")]
    InvalidResponse(String),
}

/// Error body returned by the proxy on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for `GET /api/apod`
#[derive(Debug, Clone)]
pub struct ApodServerClient {
    http_client: Client,
    base_url: String,
}

impl Default for ApodServerClient {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

impl ApodServerClient {
    /// Creates a client for the proxy at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The proxy location this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/api/apod", self.base_url)
    }

    /// Loads the picture for `date`, or today's when `date` is `None`
    pub async fn fetch(&self, date: Option<NaiveDate>) -> Result<PictureRecord, ClientFetchError> {
        let mut request = self.http_client.get(self.endpoint());
        if let Some(date) = date {
            request = request.query(&[("date", date.format("%Y-%m-%d").to_string())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientFetchError::Unreachable(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientFetchError::Unreachable(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(server_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| ClientFetchError::InvalidResponse(e.to_string()))
    }
}

fn server_error(status: u16, body: &str) -> ClientFetchError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    ClientFetchError::Server { status, message }
}
