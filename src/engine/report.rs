use crate::engine::SiteStatus;
use crate::inspect::{ArchiveAge, CertificateInfo, DnsSnapshot};
use crate::registration::RegistrationRecord;
use crate::seo::SeoReport;
use serde::Serialize;
use std::time::Duration;

/// Everything learned about the registrable domain
///
/// Sections are absent when their source is disabled or the check was
/// rejected before reaching them. Registration fields are flattened into
/// the top level of the serialized object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DomainInfo {
    #[serde(flatten)]
    pub registration: Option<RegistrationRecord>,

    #[serde(rename = "ssl", skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsSnapshot>,

    #[serde(rename = "domain_age", skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveAge>,
}

impl DomainInfo {
    pub fn is_empty(&self) -> bool {
        self.registration.is_none()
            && self.certificate.is_none()
            && self.dns.is_none()
            && self.archive.is_none()
    }
}

/// Report produced by one `check`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    /// The caller's input, unchanged
    pub url: String,
    pub status: SiteStatus,
    pub domain_info: DomainInfo,
    /// Present only when the page answered 2xx with HTML
    pub seo: Option<SeoReport>,
    /// Elapsed wall-clock time, e.g. `"1.27s"`
    pub duration: String,
}

impl CheckResult {
    /// A result for input rejected before any network access
    pub fn rejected(url: &str, status: SiteStatus, elapsed: Duration) -> Self {
        Self {
            url: url.to_string(),
            status,
            domain_info: DomainInfo::default(),
            seo: None,
            duration: format_duration(elapsed),
        }
    }
}

/// URLs discovered by one `crawl`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    pub urls: Vec<String>,
}

/// Seconds with two decimals and an `s` suffix
pub fn format_duration(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
