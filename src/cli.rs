//! Command-line interface parsing for the APOD proxy and viewer
//!
//! This module handles parsing of CLI arguments using clap. `serve` runs the
//! caching proxy, `view` runs the terminal viewer. Every option falls back to
//! an environment variable and then to a documented default.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::data::nasa::NASA_APOD_URL;
use crate::data::server_client::DEFAULT_SERVER_URL;

/// Date of the first Astronomy Picture of the Day
pub fn first_apod_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1995, 6, 16).unwrap_or(NaiveDate::MIN)
}

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The value is not a `YYYY-MM-DD` date
    #[error("Invalid date: '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The date is after today
    #[error("Date {0} is in the future")]
    FutureDate(NaiveDate),

    /// The date is before the first APOD
    #[error("Date {0} is before the first APOD ({first})", first = first_apod_date())]
    BeforeFirstApod(NaiveDate),
}

/// NASA Astronomy Picture of the Day - caching proxy and terminal viewer
#[derive(Parser, Debug)]
#[command(name = "apod")]
#[command(about = "Caching proxy and terminal viewer for NASA's Astronomy Picture of the Day")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the caching proxy exposing GET /api/apod
    Serve(ServeArgs),
    /// Browse pictures in the terminal through a running proxy
    View(ViewArgs),
}

/// Options for `apod serve`
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "APOD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// NASA API key (DEMO_KEY is heavily rate limited)
    #[arg(long, env = "NASA_API_KEY", default_value = "DEMO_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Upstream APOD endpoint
    #[arg(long, env = "APOD_UPSTREAM_URL", default_value = NASA_APOD_URL)]
    pub upstream_url: String,

    /// How long a fetched picture is served from cache
    #[arg(long, env = "APOD_CACHE_TTL_HOURS", default_value_t = 24)]
    pub cache_ttl_hours: u64,

    /// Give up on an upstream request after this many seconds
    #[arg(long, env = "APOD_UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,
}

/// Options for `apod view`
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Base URL of the APOD proxy
    #[arg(long, env = "APOD_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Open on this date instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

/// Parses a date argument, rejecting dates outside the APOD archive.
///
/// # Arguments
/// * `s` - The date string from CLI
///
/// # Returns
/// * `Ok(NaiveDate)` if the string is a date between the first APOD and today
/// * `Err(CliError)` otherwise
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, CliError> {
    parse_date_arg_with_today(s, Local::now().date_naive())
}

fn parse_date_arg_with_today(s: &str, today: NaiveDate) -> Result<NaiveDate, CliError> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::InvalidDate(s.to_string()))?;

    if date > today {
        return Err(CliError::FutureDate(date));
    }
    if date < first_apod_date() {
        return Err(CliError::BeforeFirstApod(date));
    }
    Ok(date)
}
