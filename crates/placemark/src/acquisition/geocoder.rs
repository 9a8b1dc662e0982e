//! Reverse geocoding with a memo cache and bounded retry.

use super::geocode_cache::{EvictionPolicy, GeocodeCache};
use super::http_client::{FetchError, HttpClient};
use crate::place::LatLon;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// One reverse-geocode request. Implementations do not retry.
#[async_trait]
pub trait ReverseGeocodeApi: Send + Sync {
    async fn reverse(&self, point: LatLon) -> Result<String, FetchError>;
}

/// Reverse endpoint response. Only the display name is used.
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim-compatible `/reverse` endpoint.
pub struct NominatimClient {
    http: HttpClient,
    endpoint: url::Url,
}

impl NominatimClient {
    pub fn new(http: HttpClient, endpoint: url::Url) -> Self {
        Self { http, endpoint }
    }

    fn request_url(&self, point: LatLon) -> url::Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &point.lat.to_string())
            .append_pair("lon", &point.lon.to_string())
            .append_pair("format", "json");
        url
    }
}

#[async_trait]
impl ReverseGeocodeApi for NominatimClient {
    async fn reverse(&self, point: LatLon) -> Result<String, FetchError> {
        let resp = self
            .http
            .inner()
            .get(self.request_url(point))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let parsed: NominatimReverse = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(parsed.display_name.unwrap_or_default())
    }
}

/// Attempt budget and exponential backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Counters for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeocodeStats {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub failures: u64,
}

/// Memoized reverse geocoder. Owned by a single pipeline run.
pub struct Geocoder {
    api: Box<dyn ReverseGeocodeApi>,
    cache: GeocodeCache,
    retry: RetryPolicy,
    requests: u64,
    failures: u64,
}

impl Geocoder {
    pub fn new(api: Box<dyn ReverseGeocodeApi>, policy: EvictionPolicy, retry: RetryPolicy) -> Self {
        Self {
            api,
            cache: GeocodeCache::new(policy),
            retry,
            requests: 0,
            failures: 0,
        }
    }

    /// Address for `point`, or `None` when the lookup failed.
    ///
    /// Failures are logged and never cached, so a later row at the same
    /// spot will try again.
    pub async fn reverse_geocode(&mut self, point: LatLon) -> Option<String> {
        if let Some(address) = self.cache.get(&point) {
            debug!("geocode cache hit for {}", point.cache_key());
            return Some(address);
        }

        match self.request_with_retry(point).await {
            Ok(address) => {
                self.cache.insert(&point, address.clone());
                Some(address)
            }
            Err(e) => {
                self.failures += 1;
                warn!("geocoding failed for {},{}: {e}", point.lat, point.lon);
                None
            }
        }
    }

    async fn request_with_retry(&mut self, point: LatLon) -> Result<String, FetchError> {
        let mut attempt = 1;
        loop {
            self.requests += 1;
            match self.api.reverse(point).await {
                Ok(address) => return Ok(address),
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    debug!(
                        "geocode attempt {attempt}/{} failed ({e}), retrying in {delay:?}",
                        self.retry.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn stats(&self) -> GeocodeStats {
        GeocodeStats {
            requests: self.requests,
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
            failures: self.failures,
        }
    }
}
