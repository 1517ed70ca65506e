//! MediaWiki origin client.
//!
//! Fetches revision metadata and template-expanded wikitext for a page.
//!
//! ### Endpoints
//!
//! - **Metadata**: `{rest_api_url}/page/{title}/bare`, returns `latest.id` and
//!   `latest.timestamp` without page content.
//! - **Content**: `{api_url}?action=expandtemplates&text={{:title}}&prop=wikitext&format=json`,
//!   returns `expandtemplates.wikitext` with all transclusions resolved.
//!
//! ### Politeness
//!
//! - Optional minimum interval between requests.
//! - Retries on timeouts, connection failures, 429 and 5xx with linear backoff.

pub mod error;
pub mod request;
pub mod response;

pub use error::MediaWikiError;
pub use request::ExpandTemplatesParams;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::header::{self, HeaderMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;
use wikicache_core::{AppConfig, ContentSource, Error, ExpandedContent, ResourceId, RevisionDescriptor};

use response::{BarePageResponse, ExpandTemplatesResponse, parse_json};

/// Default Action API endpoint.
const DEFAULT_API_URL: &str = "https://bulbapedia.bulbagarden.net/w/api.php";

/// Default REST API base.
const DEFAULT_REST_API_URL: &str = "https://bulbapedia.bulbagarden.net/w/rest.php/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "wikicache/0.1";

/// Base delay between retries; attempt `n` waits `n * RETRY_BACKOFF`.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// MediaWiki client configuration.
#[derive(Debug, Clone)]
pub struct MediaWikiConfig {
    /// Action API endpoint (default: Bulbapedia `api.php`).
    pub api_url: String,
    /// REST API base (default: Bulbapedia `rest.php/v1`).
    pub rest_api_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: wikicache/0.x).
    pub user_agent: String,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Base retry delay.
    pub retry_backoff: Duration,
    /// Minimum interval between requests (default: none).
    pub min_request_interval: Duration,
}

impl Default for MediaWikiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            rest_api_url: DEFAULT_REST_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 2,
            retry_backoff: RETRY_BACKOFF,
            min_request_interval: Duration::ZERO,
        }
    }
}

impl From<&AppConfig> for MediaWikiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            rest_api_url: config.rest_api_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            retry_backoff: RETRY_BACKOFF,
            min_request_interval: config.min_request_interval(),
        }
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self { last_request: Mutex::new(None), min_interval }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Successful response body with its headers.
struct RawResponse {
    headers: HeaderMap,
    body: Bytes,
}

/// MediaWiki API client.
#[derive(Debug, Clone)]
pub struct MediaWikiClient {
    http: reqwest::Client,
    api_url: Url,
    rest_api_url: Url,
    config: MediaWikiConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl MediaWikiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MediaWikiConfig) -> Result<Self, MediaWikiError> {
        let api_url = request::parse_base_url(&config.api_url)?;
        let rest_api_url = request::parse_base_url(&config.rest_api_url)?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| MediaWikiError::Network(Arc::new(e)))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.min_request_interval));

        Ok(Self { http, api_url, rest_api_url, config, rate_limiter })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &MediaWikiConfig {
        &self.config
    }

    /// Latest revision metadata for a page title (canonical form).
    pub async fn fetch_latest_revision(&self, title: &str) -> Result<RevisionDescriptor, MediaWikiError> {
        let url = request::bare_page_url(&self.rest_api_url, title)?;
        let raw = self.get_with_retry(url, None).await?;
        let page: BarePageResponse = parse_json(&raw.body)?;
        RevisionDescriptor::try_from(page)
    }

    /// Template-expanded wikitext for a page title (canonical form).
    pub async fn fetch_expanded_wikitext(&self, title: &str) -> Result<ExpandedContent, MediaWikiError> {
        let params = ExpandTemplatesParams::for_title(title);
        let requested_at = Utc::now();
        let start = Instant::now();

        let raw = self.get_with_retry(self.api_url.clone(), Some(&params)).await?;
        let elapsed = start.elapsed();

        let server_date = raw
            .headers
            .get(header::DATE)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let response: ExpandTemplatesResponse = parse_json(&raw.body)?;
        let text = response.into_wikitext()?;

        tracing::debug!(title, bytes = text.len(), elapsed = ?elapsed, ?server_date, "fetched expanded wikitext");

        Ok(ExpandedContent { text, requested_at, server_date, elapsed })
    }

    async fn get_with_retry(
        &self, url: Url, query: Option<&ExpandTemplatesParams>,
    ) -> Result<RawResponse, MediaWikiError> {
        let mut attempt = 0;
        loop {
            match self.get_once(&url, query).await {
                Ok(raw) => return Ok(raw),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff * attempt;
                    tracing::warn!(%url, attempt, error = %e, delay = ?delay, "transient MediaWiki failure, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: &Url, query: Option<&ExpandTemplatesParams>) -> Result<RawResponse, MediaWikiError> {
        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let mut request = self.http.get(url.clone()).header(header::ACCEPT, "application/json");
        if let Some(query) = query {
            request = request.query(query);
        }

        tracing::debug!(%url, "requesting MediaWiki API");

        let response = request.send().await?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            return Err(MediaWikiError::HttpError { status: status.as_u16() });
        }

        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), elapsed = ?start.elapsed(), "MediaWiki response");

        Ok(RawResponse { headers, body })
    }
}

#[async_trait]
impl ContentSource for MediaWikiClient {
    async fn latest_revision(&self, resource: &ResourceId) -> Result<RevisionDescriptor, Error> {
        Ok(self.fetch_latest_revision(resource.canonical()).await?)
    }

    async fn expanded_content(&self, resource: &ResourceId) -> Result<ExpandedContent, Error> {
        Ok(self.fetch_expanded_wikitext(resource.canonical()).await?)
    }
}
