//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building HTTP clients with the resolved identity header
//! - The optional fixed delay before each request
//! - Error classification into `FetchError`
//!
//! Requests are issued one at a time; nothing here dispatches concurrently.

use crate::config::FetcherConfig;
use crate::crawler::identity::{resolve_user_agent, BrowserIdentity, IdentityProvider, StaticIdentity};
use crate::FetchError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

/// Fixed per-request timeout
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability to retrieve a page by URL
///
/// Failures are always node-level: callers log and skip, they never abort a run.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Fetches the body of `url` exactly as received
    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// Fetches and parses `url` as an HTML document
    ///
    /// Invalid UTF-8 is replaced for parsing only; `fetch_raw` keeps the bytes.
    async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        let body = self.fetch_raw(url).await?;
        Ok(Html::parse_document(&String::from_utf8_lossy(&body)))
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use wa_law_scraper::crawler::build_http_client;
///
/// let client = build_http_client("WA-Law-Scraper/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(FETCH_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Blocking-style page fetcher over a reqwest client
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    delay: Option<Duration>,
}

impl PageFetcher {
    /// Creates a fetcher presenting the identity from `provider`
    ///
    /// A failing provider falls back to `fallback_user_agent`.
    pub fn new(
        provider: &dyn IdentityProvider,
        fallback_user_agent: &str,
        delay: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let user_agent = resolve_user_agent(provider, fallback_user_agent);
        let client = build_http_client(&user_agent)?;
        Ok(Self { client, delay })
    }

    /// Creates a fetcher from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let delay = config
            .rate_limit
            .then(|| Duration::from_millis(config.delay_ms));

        if config.spoof_user_agent {
            Self::new(&BrowserIdentity::default(), &config.fallback_user_agent, delay)
        } else {
            let identity = StaticIdentity(config.fallback_user_agent.clone());
            Self::new(&identity, &config.fallback_user_agent, delay)
        }
    }

    /// The configured inter-request delay, if rate limiting is enabled
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }
}

impl PageSource for PageFetcher {
    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        tracing::info!("Requesting: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify_error(url, e))?;
        Ok(body.to_vec())
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
