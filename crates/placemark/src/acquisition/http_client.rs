//! HTTP access for short-link resolution and reverse geocoding.
//!
//! Resolution code talks to the [`PageFetcher`] trait, not to `reqwest`
//! directly, so the strategy chain can be exercised without a network.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Redirects followed before giving up on a short link.
const MAX_REDIRECTS: usize = 10;

/// A fetched page after redirects.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// URL after all redirects were followed.
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

/// Transport-level failure of a single request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("request failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Connection errors, timeouts and 5xx responses may succeed on retry.
    /// Client errors and malformed bodies will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Connect(_) | FetchError::Timeout => true,
            FetchError::Status(code) => *code >= 500,
            FetchError::Decode(_) | FetchError::Other(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_decode() || e.is_body() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Other(e.to_string())
        }
    }
}

/// Fetch a page, following redirects.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// `reqwest`-backed client shared by the fetcher and the geocoder.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the given `User-Agent` and per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// The underlying `reqwest` client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// GET `url`. Non-2xx responses are returned, not turned into errors.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let resp = self.client.get(url).send().await?;
        let final_url = resp.url().to_string();
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(HttpResponse {
            final_url,
            status,
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new("placemark-test", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::Connect("refused".into()).is_retryable());
        assert!(FetchError::Status(503).is_retryable());
        assert!(!FetchError::Status(404).is_retryable());
        assert!(!FetchError::Decode("bad json".into()).is_retryable());
    }

    #[tokio::test]
    async fn test_get_follows_redirects() {
        let server = MockServer::start().await;
        let target = format!("{}/maps/place/Cafe/@40.7128,-74.006,17z", server.uri());

        Mock::given(method("GET"))
            .and(path("/short"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", target.as_str()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/maps/place/Cafe/@40.7128,-74.006,17z"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let resp = client()
            .fetch(&format!("{}/short", server.uri()))
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.final_url, target);
        assert_eq!(resp.body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_get_returns_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let resp = client()
            .get(&format!("{}/missing", server.uri()))
            .await
            .unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body, "gone");
    }

    #[tokio::test]
    async fn test_connection_refused_is_connect_error() {
        let err = client().get("http://127.0.0.1:9/").await.unwrap_err();
        assert!(err.is_retryable(), "unexpected error: {err:?}");
    }
}
