//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with browser-like headers and a cookie store
//! - Priming session cookies with an initial visit
//! - GET requests returning the response body as text
//! - Error classification (status, timeout, transport)

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::{CrawlerError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Builds an HTTP client with the configured headers and timeouts
///
/// The client keeps cookies between requests so a priming visit carries over
/// to the listing and review requests that follow.
///
/// # Example
///
/// ```no_run
/// use shelfcrawl::config::Config;
/// use shelfcrawl::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> std::result::Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    if let Ok(language) = HeaderValue::from_str(&user_agent.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, language);
    }

    Client::builder()
        .user_agent(user_agent.value.clone())
        .default_headers(headers)
        .cookie_store(true)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues single GET requests on behalf of the paginators
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher from the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        Ok(Self { client })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns its body
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Non-2xx status | `CrawlerError::Status` |
    /// | Timeout | `CrawlerError::Timeout` |
    /// | Connection or body failure | `CrawlerError::Http` |
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify(url, e))
    }

    /// Visits `url` once to collect session cookies
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn prime(&self, url: &Url) {
        match self.get_text(url).await {
            Ok(_) => tracing::debug!("Primed session cookies from {}", url),
            Err(e) => tracing::warn!("Session priming via {} failed: {}", url, e),
        }
    }
}

fn classify(url: &Url, error: reqwest::Error) -> CrawlerError {
    if error.is_timeout() {
        CrawlerError::Timeout {
            url: url.to_string(),
        }
    } else {
        CrawlerError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
