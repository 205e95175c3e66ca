//! Crawler module for page fetching and same-site link discovery
//!
//! This module contains:
//! - The page fetcher shared with the check orchestrator
//! - HTML link extraction
//! - The explicit crawl frontier
//! - The crawl loop itself

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::Crawler;
pub use fetcher::{build_http_client, FetchError, FetchedPage, PageFetcher};
pub use frontier::CrawlFrontier;
pub use parser::extract_links;
