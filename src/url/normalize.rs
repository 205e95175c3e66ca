use crate::url::domain::registrable_domain;
use crate::UrlError;
use serde::Serialize;
use url::{Host, ParseError, Url};

/// A validated, scheme-applied target and the registrable domain behind it
///
/// Created once per request; every inspector and registration provider is
/// keyed by `registrable_domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedTarget {
    /// The input with a scheme applied, parsed as an absolute URL
    pub url: Url,

    /// Second-level label plus public suffix, e.g. `example.co.uk`
    pub registrable_domain: String,
}

/// Prefixes `http://` when the input carries no scheme
///
/// Surrounding whitespace is dropped first.
///
/// # Examples
///
/// ```
/// use sumi_scope::url::apply_scheme;
///
/// assert_eq!(apply_scheme("example.com"), "http://example.com");
/// assert_eq!(apply_scheme("https://example.com"), "https://example.com");
/// assert_eq!(
///     apply_scheme("example.com/go?to=https://other.org"),
///     "http://example.com/go?to=https://other.org"
/// );
/// ```
pub fn apply_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// True if the input starts with `scheme://`
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`;
/// a `://` further into a path or query does not count.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Normalizes a raw input string into a `NormalizedTarget`
///
/// # Normalization Steps
///
/// 1. Apply `http://` if no scheme is present
/// 2. Parse the URL; host syntax errors are domain errors, anything else is a URL error
/// 3. Require an `http` or `https` scheme and a host
/// 4. Reject IP literals (they have no registrable domain)
/// 5. Derive the registrable domain from the public suffix list
///
/// No network access is performed.
///
/// # Returns
///
/// * `Ok(NormalizedTarget)` - The validated target
/// * `Err(UrlError::InvalidUrl)` - The input is not a well-formed absolute URL
/// * `Err(UrlError::InvalidDomain)` - No registrable domain can be extracted
///
/// # Examples
///
/// ```
/// use sumi_scope::url::normalize_target;
///
/// let target = normalize_target("blog.example.co.uk/post").unwrap();
/// assert_eq!(target.url.as_str(), "http://blog.example.co.uk/post");
/// assert_eq!(target.registrable_domain, "example.co.uk");
/// ```
pub fn normalize_target(raw: &str) -> Result<NormalizedTarget, UrlError> {
    let candidate = apply_scheme(raw);

    let url = Url::parse(&candidate).map_err(|e| match e {
        ParseError::InvalidDomainCharacter
        | ParseError::IdnaError
        | ParseError::InvalidIpv4Address
        | ParseError::InvalidIpv6Address => UrlError::InvalidDomain(raw.trim().to_string()),
        other => UrlError::InvalidUrl(format!("{}: {}", raw.trim(), other)),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    let host = match url.host() {
        Some(Host::Domain(host)) if !host.is_empty() => host.to_string(),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
            return Err(UrlError::InvalidDomain(format!(
                "{} is an IP address",
                raw.trim()
            )))
        }
        _ => return Err(UrlError::InvalidUrl(format!("{}: missing host", raw.trim()))),
    };

    let registrable_domain = registrable_domain(&host)?;

    Ok(NormalizedTarget {
        url,
        registrable_domain,
    })
}
