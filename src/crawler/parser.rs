//! HTML link extraction for the crawler
//!
//! Every `<a href>` is resolved to an absolute, fragment-free URL. Links that
//! can never be fetched (`javascript:`, `mailto:`, `tel:`, data URIs, non-HTTP
//! schemes after resolution) are dropped here; host scoping is left to the
//! crawl loop.

use crate::url::strip_fragment;
use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from an HTML document
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Returns
///
/// Absolute URLs with fragments removed, in document order (duplicates kept)
///
/// # Example
///
/// ```
/// use sumi_scope::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page#top">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_links(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let a_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (they point back at the base page)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(strip_fragment(&absolute_url))
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
