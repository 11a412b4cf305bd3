//! HTTP transport
//!
//! Every request in a crawl is a plain GET carrying the region cookie. The
//! [`Transport`] trait is the seam between the crawl engine and the network,
//! so the dispatcher and enricher can be driven by an in-memory transport in
//! tests.

use crate::config::UserAgentConfig;
use crate::ScoutError;
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Name of the cookie that selects the listing region
pub const REGION_COOKIE: &str = "urlJumpIp";

/// The region cookie attached to every request of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCookie {
    value: String,
}

impl RegionCookie {
    /// Creates a cookie selecting the given region code
    pub fn new(region: u32) -> Self {
        Self {
            value: region.to_string(),
        }
    }

    /// Returns the raw cookie value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Formats the cookie as a `Cookie` header value
    pub fn header_value(&self) -> String {
        format!("{}={}", REGION_COOKIE, self.value)
    }
}

impl Default for RegionCookie {
    /// Taipei, the site's own default region
    fn default() -> Self {
        Self::new(1)
    }
}

/// A capability to GET a page body with the region cookie attached
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the response body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The response body
    /// * `Err(ScoutError)` - The request could not be built or executed
    async fn get(&self, url: &str, cookie: &RegionCookie) -> Result<String, ScoutError>;
}

/// [`Transport`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, cookie: &RegionCookie) -> Result<String, ScoutError> {
        // Listings without a link come through as a bare scheme
        let target = Url::parse(url).map_err(|e| ScoutError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(target)
            .header(COOKIE, cookie.header_value())
            .send()
            .await
            .map_err(|source| ScoutError::Http {
                url: url.to_string(),
                source,
            })?;

        // The body is still parsed on error statuses; it simply yields no records
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", url, status.as_u16());
        }

        response.text().await.map_err(|source| ScoutError::Http {
            url: url.to_string(),
            source,
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use rent_scout::config::UserAgentConfig;
/// use rent_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}
