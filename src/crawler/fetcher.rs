//! HTTP fetcher implementation
//!
//! This module handles single-page HTTP requests for both the crawler and the
//! check orchestrator, including:
//! - Building the shared HTTP client
//! - Per-request user agent and timeout
//! - Error classification (timeout vs. any other network failure)

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single page fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// Returns true if the request ran past its timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// A page that answered with an HTTP response (any status code)
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value (empty if absent)
    pub content_type: String,

    /// Page body; only read for HTML responses
    pub body: String,
}

impl FetchedPage {
    /// Returns true if the Content-Type announces HTML
    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }

    /// Returns true for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Builds the HTTP client shared by every HTTP-based component
///
/// The client has no global timeout or user agent: both are set per request
/// so each component can identify itself and carry its own budget.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (TLS backend initialization)
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs bounded-timeout GET requests
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a URL once, without retries
    ///
    /// Redirects are followed by the client. The body is read only when the
    /// response is HTML; the timeout covers connecting, headers and body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `user_agent` - User-Agent header for this request
    /// * `timeout` - Total time budget for this request
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - The server answered (status may be non-2xx)
    /// * `Err(FetchError::Timeout)` - The request ran out of time
    /// * `Err(FetchError::Network)` - Connection, TLS, DNS or protocol failure
    pub async fn fetch(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let mut page = FetchedPage {
            final_url,
            status_code,
            content_type,
            body: String::new(),
        };

        if page.is_html() {
            page.body = response
                .text()
                .await
                .map_err(|e| FetchError::from_reqwest(url, e))?;
        }

        tracing::debug!(
            "Fetched {} -> {} ({})",
            url,
            page.status_code,
            page.content_type
        );

        Ok(page)
    }
}
