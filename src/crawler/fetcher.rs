//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured timeout and user agent
//! - Following redirects only while they stay on the requested origin
//! - GET requests returning the page body as text
//! - Error classification into [`FetchError`]

use crate::config::CrawlerConfig;
use crate::url::PageUrl;
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Maximum number of same-origin redirect hops per request
const MAX_REDIRECTS: usize = 10;

/// A failed fetch of a single URL
///
/// Fetch errors are recovered locally: the URL is marked failed and the crawl
/// continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout { url: String },

    #[error("connection failed: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("redirected off-site to {location}")]
    OffsiteRedirect { url: String, location: String },

    #[error("redirect failed: {source}")]
    Redirect { url: String, source: reqwest::Error },

    #[error("failed to read body: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("request failed: {source}")]
    Request { url: String, source: reqwest::Error },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::OffsiteRedirect { url, .. }
            | Self::Redirect { url, .. }
            | Self::Body { url, .. }
            | Self::Request { url, .. } => url,
        }
    }

    fn from_reqwest(url: &PageUrl, error: reqwest::Error) -> Self {
        let url = url.as_str().to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_redirect() {
            Self::Redirect { url, source: error }
        } else if error.is_connect() {
            Self::Connect { url, source: error }
        } else if error.is_body() || error.is_decode() {
            Self::Body { url, source: error }
        } else {
            Self::Request { url, source: error }
        }
    }
}

/// Transport used by the crawler to retrieve page bodies
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the full response body as text
    async fn fetch(&self, url: &PageUrl) -> Result<String, FetchError>;
}

/// Redirect policy that never leaves the origin of the original request
///
/// An off-site hop stops the chain and hands the 3xx response back to the
/// caller, so no foreign page body is ever parsed as part of the site.
fn same_origin_redirects() -> Policy {
    Policy::custom(|attempt| {
        let origin = attempt.previous().first().map(|first| first.origin());

        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if origin != Some(attempt.url().origin()) {
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_sweep::config::CrawlerConfig;
/// use site_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .redirect(same_origin_redirects())
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a URL
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection refused / DNS / TLS | `FetchError::Connect` |
    /// | Redirect to another origin | `FetchError::OffsiteRedirect` |
    /// | Redirect chain > 10 hops | `FetchError::Redirect` |
    /// | Other non-2xx status | `FetchError::Status` (body drained first) |
    /// | Body read or decode failure | `FetchError::Body` |
    ///
    /// Same-origin redirects are followed by the client; nothing is retried.
    async fn fetch(&self, url: &PageUrl) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.url().clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            // Drain so the connection goes back to the pool
            let _ = response.bytes().await;

            let url = url.as_str().to_string();
            return Err(match location {
                Some(location) if status.is_redirection() => {
                    FetchError::OffsiteRedirect { url, location }
                }
                _ => FetchError::Status { url, status },
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&CrawlerConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::from_config(&CrawlerConfig::default()).unwrap();
        let url = PageUrl::from_seed(&format!("{}/page", server.uri())).unwrap();

        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::from_config(&CrawlerConfig::default()).unwrap();
        let url = PageUrl::from_seed(&format!("{}/missing", server.uri())).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
        assert_eq!(err.url(), url.as_str());
    }

    #[tokio::test]
    async fn test_fetch_follows_same_origin_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::from_config(&CrawlerConfig::default()).unwrap();
        let url = PageUrl::from_seed(&format!("{}/old", server.uri())).unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap(), "moved here");
    }

    #[tokio::test]
    async fn test_fetch_stops_at_offsite_redirect() {
        let site = MockServer::start().await;
        let elsewhere = MockServer::start().await;
        let landing = format!("{}/landing", elsewhere.uri());

        Mock::given(method("GET"))
            .and(path("/go"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", landing.as_str()))
            .mount(&site)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/ghost">x</a>"#))
            .expect(0)
            .mount(&elsewhere)
            .await;

        let fetcher = HttpFetcher::from_config(&CrawlerConfig::default()).unwrap();
        let url = PageUrl::from_seed(&format!("{}/go", site.uri())).unwrap();

        match fetcher.fetch(&url).await.unwrap_err() {
            FetchError::OffsiteRedirect { location, .. } => assert_eq!(location, landing),
            other => panic!("expected off-site redirect, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_redirect_loop_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::from_config(&CrawlerConfig::default()).unwrap();
        let url = PageUrl::from_seed(&format!("{}/loop", server.uri())).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Redirect { .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = CrawlerConfig {
            request_timeout: 1,
            ..CrawlerConfig::default()
        };
        let fetcher = HttpFetcher::from_config(&config).unwrap();
        let url = PageUrl::from_seed(&format!("{}/slow", server.uri())).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop a listener to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = HttpFetcher::from_config(&CrawlerConfig::default()).unwrap();
        let url = PageUrl::from_seed(&format!("http://127.0.0.1:{}/", port)).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Connect { .. }));
    }
}
