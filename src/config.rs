//! Configuration loader for the `firewatch-dashboard` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::{env, time::Duration};

use anyhow::{anyhow, bail, Result};
use reqwest::Url;

/// Placeholder shown in the feed slot while the live feed is stopped.
pub const DEFAULT_NO_SIGNAL_IMAGE: &str =
    "https://placehold.co/600x400/374151/f3f4f6?text=NO+SIGNAL";

/// Parse an optional numeric environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Upstream status endpoint polled by the dashboard.
    pub status_url: Url,

    /// Live video feed shown while the feed is running.
    pub video_feed_url: String,

    /// Image shown in place of the feed while it is stopped.
    pub no_signal_image_url: String,

    /// Delay between two polls of the status endpoint.
    pub poll_interval: Duration,

    /// Upper bound for one status request.
    pub http_timeout: Duration,

    /// Port the dashboard listens on.
    pub listen_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `STATUS_API_URL` – upstream status endpoint
///
/// Optional:
/// - `VIDEO_FEED_URL` – live feed (default: `/video_feed` on the status host)
/// - `NO_SIGNAL_IMAGE_URL` – stopped-feed placeholder
/// - `POLL_INTERVAL_MS` – poll cadence (default: 2000)
/// - `HTTP_TIMEOUT_MS` – per-request timeout (default: 5000)
/// - `LISTEN_PORT` – dashboard port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let status_url = require_env!("STATUS_API_URL");
    let status_url = Url::parse(&status_url)
        .map_err(|e| anyhow!("Invalid STATUS_API_URL '{}': {}", status_url, e))?;

    let video_feed_url = match env::var("VIDEO_FEED_URL") {
        Ok(url) => url,
        Err(_) => default_video_feed_url(&status_url)?,
    };
    let no_signal_image_url =
        env::var("NO_SIGNAL_IMAGE_URL").unwrap_or_else(|_| DEFAULT_NO_SIGNAL_IMAGE.to_string());

    let poll_interval_ms = parse_env!("POLL_INTERVAL_MS", u64, 2000);
    if poll_interval_ms == 0 {
        bail!("Invalid POLL_INTERVAL_MS: must be greater than zero");
    }
    let http_timeout_ms = parse_env!("HTTP_TIMEOUT_MS", u64, 5000);
    let listen_port = parse_env!("LISTEN_PORT", u16, 8080);

    Ok(Config {
        status_url,
        video_feed_url,
        no_signal_image_url,
        poll_interval: Duration::from_millis(poll_interval_ms),
        http_timeout: Duration::from_millis(http_timeout_ms),
        listen_port,
    })
}

/// The backend serves its MJPEG stream next to the status API.
fn default_video_feed_url(status_url: &Url) -> Result<String> {
    // ---
    status_url
        .join("/video_feed")
        .map(String::from)
        .map_err(|e| anyhow!("Cannot derive video feed URL from {}: {}", status_url, e))
}

/// Hide the password component of a URL, if any.
fn mask_credentials(url: &Url) -> String {
    // ---
    if url.password().is_none() {
        return url.to_string();
    }
    let mut masked = url.clone();
    // set_password only fails for cannot-be-a-base URLs, which carry no password
    let _ = masked.set_password(Some("****"));
    masked.to_string()
}

impl Config {
    /// Page reload period: the poll interval in whole seconds, rounded up.
    pub fn page_refresh_secs(&self) -> u64 {
        (self.poll_interval.as_millis().div_ceil(1000) as u64).max(1)
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks credentials embedded in the status URL while showing
    /// all configuration values that were loaded.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  STATUS_API_URL      : {}", mask_credentials(&self.status_url));
        tracing::info!("  VIDEO_FEED_URL      : {}", self.video_feed_url);
        tracing::info!("  NO_SIGNAL_IMAGE_URL : {}", self.no_signal_image_url);
        tracing::info!("  POLL_INTERVAL_MS    : {}", self.poll_interval.as_millis());
        tracing::info!("  HTTP_TIMEOUT_MS     : {}", self.http_timeout.as_millis());
        tracing::info!("  LISTEN_PORT         : {}", self.listen_port);
    }
}
