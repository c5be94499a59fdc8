use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::PollError;

pub const DEFAULT_FEED_URL: &str = "http://127.0.0.1:1111/dashboard/notifications/latest";
pub const DEFAULT_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    pub interval: Duration,
}

impl Config {
    pub fn load() -> Result<Self, PollError> {
        Self::load_with(None, None)
    }

    /// Environment values are only read for settings without an override.
    pub fn load_with(feed_url: Option<String>, interval_ms: Option<u64>) -> Result<Self, PollError> {
        let feed_url = match feed_url {
            Some(url) => url,
            None => try_load("FEED_URL", DEFAULT_FEED_URL)?,
        };
        let interval_ms = match interval_ms {
            Some(ms) => ms,
            None => try_load("POLL_INTERVAL_MS", &DEFAULT_INTERVAL_MS.to_string())?,
        };

        Self::new(feed_url, interval_ms)
    }

    pub fn new(feed_url: impl Into<String>, interval_ms: u64) -> Result<Self, PollError> {
        let feed_url = feed_url.into();

        if !feed_url.starts_with("http://") && !feed_url.starts_with("https://") {
            return Err(PollError::Config(format!("feed url must be http(s): {feed_url}")));
        }

        // tokio intervals panic on a zero period
        if interval_ms == 0 {
            return Err(PollError::Config("poll interval must be positive".to_string()));
        }

        Ok(Self {
            feed_url,
            interval: Duration::from_millis(interval_ms),
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, PollError>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            PollError::Config(format!("{key}: {e}"))
        })
}
