//! Core data models for the APOD proxy and viewer
//!
//! This module contains the picture record shared by the proxy and the viewer,
//! along with the HTTP clients that produce it: the upstream NASA client used by
//! the proxy, and the proxy client used by the viewer.

pub mod nasa;
pub mod server_client;

pub use nasa::{ApodSource, NasaClient, UpstreamError};
pub use server_client::{ApodServerClient, ClientFetchError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of media published for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A still picture, optionally with a high-resolution variant
    Image,
    /// A video, usually an embeddable player URL
    Video,
}

impl MediaType {
    /// Parses the upstream `media_type` string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }

    /// Short human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Image => "Image",
            MediaType::Video => "Video",
        }
    }
}

/// The Astronomy Picture of the Day for one date
///
/// Serialized in camelCase, which is the shape served by `GET /api/apod`
/// and read back by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureRecord {
    /// Publication date
    pub date: NaiveDate,
    /// Title of the picture
    pub title: String,
    /// Explanation written by the APOD editors
    pub explanation: String,
    /// Whether `url` points at an image or a video
    pub media_type: MediaType,
    /// Primary media location
    pub url: String,
    /// Higher-resolution image location, images only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_url: Option<String>,
    /// Copyright holder, when the picture is not public domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl PictureRecord {
    /// Location to open in the enlarged view: the HD image if present, else `url`
    pub fn large_url(&self) -> &str {
        self.hd_url.as_deref().unwrap_or(&self.url)
    }

    /// Whether the record can be shown in the enlarged image view
    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }
}
