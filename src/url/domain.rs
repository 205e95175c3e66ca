use crate::UrlError;
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scope::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives the registrable domain (label + public suffix) of a host
///
/// The suffix must be a known entry of the public suffix list; a trailing
/// root dot is ignored.
///
/// # Returns
///
/// * `Ok(String)` - e.g. `example.co.uk` for `www.example.co.uk`
/// * `Err(UrlError::InvalidDomain)` - the host is a bare suffix, a single label, or has an unknown suffix
pub fn registrable_domain(host: &str) -> Result<String, UrlError> {
    let host = host.trim_end_matches('.').to_lowercase();

    let domain = psl::domain(host.as_bytes())
        .ok_or_else(|| UrlError::InvalidDomain(format!("{} has no registrable domain", host)))?;

    if !domain.suffix().is_known() {
        return Err(UrlError::InvalidDomain(format!(
            "{} has no recognized public suffix",
            host
        )));
    }

    std::str::from_utf8(domain.as_bytes())
        .map(str::to_string)
        .map_err(|_| UrlError::InvalidDomain(host.clone()))
}

/// Key identifying "the same site" for crawl scoping
///
/// Host plus effective port, so `http://a.test/` and `http://a.test:80/` match
/// while `http://a.test:8080/` does not.
pub fn site_key(url: &Url) -> Option<(String, Option<u16>)> {
    extract_domain(url).map(|host| (host, url.port_or_known_default()))
}

/// Returns the URL as a string with any fragment removed
pub fn strip_fragment(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}
