//! Crawler coordinator - the same-site crawl loop
//!
//! The loop drives the page fetcher over the frontier:
//! - Taking the next pending URL
//! - Skipping URLs on another host
//! - Fetching and, for 200 HTML pages, extracting and enqueuing links
//! - Stopping when the frontier is empty or the page budget is spent

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::CrawlFrontier;
use crate::crawler::parser::extract_links;
use crate::url::{site_key, strip_fragment};
use crate::UrlError;
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Same-site link crawler
#[derive(Debug, Clone)]
pub struct Crawler {
    fetcher: PageFetcher,
    user_agent: String,
    timeout: Duration,
}

impl Crawler {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The page fetcher (shared HTTP client)
    /// * `user_agent` - User-Agent identifying the crawler
    /// * `timeout` - Per-page request timeout
    pub fn new(fetcher: PageFetcher, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            fetcher,
            user_agent: user_agent.into(),
            timeout,
        }
    }

    /// Crawls a site and returns every visited same-site URL
    ///
    /// Never fails: if the start URL cannot be parsed the result is just
    /// `{start_url}`. Per-page fetch failures are logged and the page stays
    /// visited without being expanded.
    ///
    /// # Arguments
    ///
    /// * `start_url` - Absolute URL to start from; relative links are resolved against it
    /// * `max_pages` - Upper bound on the number of visited URLs
    pub async fn crawl(&self, start_url: &str, max_pages: usize) -> BTreeSet<String> {
        match self.try_crawl(start_url, max_pages).await {
            Ok(visited) => visited,
            Err(e) => {
                tracing::warn!("Crawl failed for {}: {}", start_url, e);
                BTreeSet::from([start_url.to_string()])
            }
        }
    }

    /// Crawls a site, failing only if the start URL is unusable
    ///
    /// # Returns
    ///
    /// * `Ok(BTreeSet<String>)` - Visited URLs, at most `max_pages` of them
    /// * `Err(UrlError::InvalidUrl)` - The start URL is not an absolute URL with a host
    pub async fn try_crawl(
        &self,
        start_url: &str,
        max_pages: usize,
    ) -> Result<BTreeSet<String>, UrlError> {
        let base = Url::parse(start_url)
            .map_err(|e| UrlError::InvalidUrl(format!("{}: {}", start_url, e)))?;
        let base_site = site_key(&base)
            .ok_or_else(|| UrlError::InvalidUrl(format!("{}: missing host", start_url)))?;

        let mut frontier = CrawlFrontier::new(strip_fragment(&base), max_pages);
        tracing::info!("Starting crawl of {} (max {} pages)", start_url, max_pages);

        while let Some(current) = frontier.next() {
            if frontier.is_visited(&current) {
                continue;
            }

            let same_site = Url::parse(&current)
                .ok()
                .and_then(|url| site_key(&url))
                .is_some_and(|key| key == base_site);
            if !same_site {
                tracing::trace!("Skipping off-site URL {}", current);
                continue;
            }

            frontier.mark_visited(&current);

            let page = match self
                .fetcher
                .fetch(&current, &self.user_agent, self.timeout)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::debug!("Not expanding {}: {}", current, e);
                    continue;
                }
            };

            if page.status_code != 200 || !page.is_html() {
                continue;
            }

            let mut discovered = 0;
            for link in extract_links(&page.body, &base) {
                if frontier.enqueue(link) {
                    discovered += 1;
                }
            }
            tracing::debug!("{}: {} new links", current, discovered);
        }

        tracing::info!(
            "Crawl of {} finished: {} pages visited, {} left pending",
            start_url,
            frontier.visited_count(),
            frontier.pending_count()
        );

        Ok(frontier.into_visited())
    }
}
