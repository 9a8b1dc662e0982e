//! Runtime settings: built-in defaults, then `PLACEMARK_*` environment
//! overrides, then command-line flags (applied by the CLI).

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GEOCODE_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_MS: u64 = 100;
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

pub const ENV_GEOCODE_URL: &str = "PLACEMARK_GEOCODE_URL";
pub const ENV_USER_AGENT: &str = "PLACEMARK_USER_AGENT";
pub const ENV_HTTP_TIMEOUT: &str = "PLACEMARK_HTTP_TIMEOUT_SECS";
pub const ENV_CACHE_SIZE: &str = "PLACEMARK_GEOCODE_CACHE_SIZE";

/// Network and enrichment settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub geocode_url: url::Url,
    pub user_agent: String,
    pub http_timeout: Duration,
    pub geocode_attempts: u32,
    pub backoff_base: Duration,
    /// Geocode cache entries kept; `0` disables eviction.
    pub cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Constant URL; parsing cannot fail.
            geocode_url: url::Url::parse(DEFAULT_GEOCODE_URL).unwrap(),
            user_agent: default_user_agent(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            geocode_attempts: DEFAULT_GEOCODE_ATTEMPTS,
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_MS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Settings {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from `lookup`. Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(v) = get(ENV_GEOCODE_URL) {
            settings.geocode_url = url::Url::parse(v.trim())
                .with_context(|| format!("{ENV_GEOCODE_URL} is not a valid URL: {v}"))?;
        }
        if let Some(v) = get(ENV_USER_AGENT) {
            settings.user_agent = v;
        }
        if let Some(v) = get(ENV_HTTP_TIMEOUT) {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_HTTP_TIMEOUT} must be a number of seconds: {v}"))?;
            settings.http_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get(ENV_CACHE_SIZE) {
            settings.cache_capacity = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_CACHE_SIZE} must be a non-negative integer: {v}"))?;
        }

        Ok(settings)
    }
}

fn default_user_agent() -> String {
    format!("placemark/{}", env!("CARGO_PKG_VERSION"))
}
