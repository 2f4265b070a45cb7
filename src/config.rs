//! Validated runtime configuration
//!
//! Raw values come from command-line flags or their environment variables
//! (see [`crate::cli`]). They are checked once here, at startup, and the rest of
//! the program only sees the validated structs.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration as StdDuration;

use chrono::Duration;
use thiserror::Error;

use crate::cli::{ServeArgs, ViewArgs};

/// Upper bound on the cache TTL, 30 days
pub const MAX_CACHE_TTL_HOURS: u64 = 24 * 30;

/// Errors found while validating configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The upstream API key is empty
    #[error("NASA API key must not be empty (set --api-key or NASA_API_KEY)")]
    MissingApiKey,

    /// The cache TTL is zero or too large
    #[error("Cache TTL must be between 1 and {max} hours, got {0}", max = MAX_CACHE_TTL_HOURS)]
    InvalidCacheTtl(u64),

    /// The upstream timeout is zero
    #[error("Upstream timeout must be at least 1 second")]
    InvalidTimeout,

    /// A URL is not http(s)
    #[error("Invalid {name} URL: '{value}' (expected http:// or https://)")]
    InvalidUrl { name: &'static str, value: String },

    /// Host and port do not form a socket address
    #[error("Invalid listen address: '{0}'")]
    InvalidListenAddress(String),
}

/// Configuration for the proxy server
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on
    pub listen_addr: SocketAddr,
    /// Key sent to the upstream API
    pub api_key: String,
    /// Upstream APOD endpoint
    pub upstream_url: String,
    /// How long a cached picture is served
    pub cache_ttl: Duration,
    /// Bound on each upstream call
    pub upstream_timeout: StdDuration,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("listen_addr", &self.listen_addr)
            .field("api_key", &"<redacted>")
            .field("upstream_url", &self.upstream_url)
            .field("cache_ttl", &self.cache_ttl)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl ServerConfig {
    /// Validates the `serve` arguments
    pub fn from_args(args: &ServeArgs) -> Result<Self, ConfigError> {
        let api_key = args.api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        if args.cache_ttl_hours == 0 || args.cache_ttl_hours > MAX_CACHE_TTL_HOURS {
            return Err(ConfigError::InvalidCacheTtl(args.cache_ttl_hours));
        }

        if args.upstream_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let upstream_url = validate_url("upstream", &args.upstream_url)?;

        let listen_addr = resolve_listen_addr(&args.host, args.port)?;

        Ok(Self {
            listen_addr,
            api_key: api_key.to_string(),
            upstream_url,
            cache_ttl: Duration::hours(args.cache_ttl_hours as i64),
            upstream_timeout: StdDuration::from_secs(args.upstream_timeout_secs),
        })
    }
}

/// Configuration for the terminal viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Base URL of the proxy
    pub server_url: String,
}

impl ViewerConfig {
    /// Validates the `view` arguments
    pub fn from_args(args: &ViewArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            server_url: validate_url("server", &args.server)?,
        })
    }
}

/// Resolves `host` (IP literal or name) and `port` to the first matching address
fn resolve_listen_addr(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    let invalid = || ConfigError::InvalidListenAddress(host.to_string());
    if host.is_empty() {
        return Err(invalid());
    }

    (host, port)
        .to_socket_addrs()
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)
}

fn validate_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidUrl {
            name,
            value: value.to_string(),
        })
    }
}
