//! Domain inspectors
//!
//! Each inspector looks at one facet of a registrable domain:
//! - `CertificateInspector`: TLS certificate on port 443
//! - `DnsInspector`: A, MX and NS records
//! - `ArchiveResolver`: earliest web-archive capture, as an age estimate
//!
//! Every inspector has a `try_inspect` returning `Result<_, InspectError>` and an
//! `inspect` that logs the failure and returns the "unknown" default instead.

mod archive;
mod certificate;
mod dns;

pub use archive::{ArchiveAge, ArchiveResolver, ArchiveStatus};
pub use certificate::{CertificateInfo, CertificateInspector};
pub use dns::{DnsInspector, DnsSnapshot};

use thiserror::Error;

/// Failure of a single inspection
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("{0} timed out")]
    Timeout(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    #[error("Invalid server name: {0}")]
    InvalidServerName(String),

    #[error("Server presented no certificate")]
    NoPeerCertificate,

    #[error("Certificate parse error: {0}")]
    Certificate(String),

    #[error("DNS lookup failed: {0}")]
    Dns(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No archived capture found")]
    NoCapture,

    #[error("Malformed capture timestamp '{0}'")]
    BadTimestamp(String),
}
