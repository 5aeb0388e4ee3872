//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests against the catalog:
//! - Building an HTTP client with the configured identity headers
//! - Resolving site-relative catalog links against the base URL
//! - GET requests with bounded retry and linear backoff
//!
//! A fetch that exhausts its retries is reported as
//! [`HarvestError::Unreachable`]; callers treat that as "skip this URL for
//! now", never as fatal to the run. The fetcher never sleeps between
//! *successful* requests: politeness delays are the caller's job, see
//! [`RateGovernor`](crate::crawler::RateGovernor).

use crate::config::{Config, CrawlerConfig, IdentityConfig};
use crate::url::resolve_link;
use crate::{HarvestError, UrlError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

impl FetchedPage {
    /// Parses the body into an HTML document
    ///
    /// `Html` is not `Send`, so callers parse, extract and drop the document
    /// before their next await point.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Builds an HTTP client with the catalog identity and timeouts
///
/// # Example
///
/// ```no_run
/// use aqua_harvest::config::{CrawlerConfig, IdentityConfig};
/// use aqua_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&IdentityConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    identity: &IdentityConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    if let Ok(value) = HeaderValue::from_str(&identity.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&identity.referer) {
        headers.insert(REFERER, value);
    }

    Client::builder()
        .user_agent(identity.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches catalog pages with retry
pub struct Fetcher {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.identity, &config.crawler)?;
        let base_url = Url::parse(&config.site.base_url)?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.crawler.max_retries.max(1),
            backoff: Duration::from_millis(config.crawler.retry_backoff_ms),
        })
    }

    /// The origin that relative catalog links resolve against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a possibly site-relative link to an absolute URL
    pub fn resolve(&self, link: &str) -> Result<Url, HarvestError> {
        let absolute = resolve_link(link, &self.base_url)
            .ok_or_else(|| UrlError::Unsupported(link.to_string()))?;
        Ok(Url::parse(&absolute)?)
    }

    /// Fetches a URL, retrying transport errors and non-2xx statuses
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Return the page |
    /// | Non-2xx status | Retry |
    /// | Timeout / connection error | Retry |
    /// | Retries exhausted | `Unreachable` |
    ///
    /// Attempt `n` that fails waits `n * retry-backoff` before the next one.
    pub async fn fetch(&self, link: &str) -> Result<FetchedPage, HarvestError> {
        let url = self.resolve(link)?;
        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            match self.fetch_once(&url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    tracing::warn!(
                        "[Attempt {}/{}] Error fetching {}: {}",
                        attempt,
                        self.max_retries,
                        url,
                        e
                    );
                    last_error = e.to_string();
                    if attempt < self.max_retries {
                        tokio::time::sleep(self.backoff * attempt).await;
                    }
                }
            }
        }

        Err(HarvestError::Unreachable {
            url: url.to_string(),
            attempts: self.max_retries,
            reason: last_error,
        })
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchedPage, HarvestError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            url: final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}
