use crate::inspect::InspectError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

const UNKNOWN: &str = "Unknown";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// TLS certificate health of a domain
///
/// All fields stay at their "Unknown"/false defaults unless a handshake
/// with default trust verification succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    pub has_ssl: bool,
    /// Issuer organization (falls back to issuer common name)
    pub issuer: String,
    /// Subject common name
    pub issued_to: String,
    pub valid_from: String,
    pub valid_until: String,
    /// Whole days until expiry; negative once expired
    pub days_until_expiry: Option<i64>,
    /// `now` lies within [valid_from, valid_until]
    pub is_valid: bool,
}

impl Default for CertificateInfo {
    fn default() -> Self {
        Self {
            has_ssl: false,
            issuer: UNKNOWN.to_string(),
            issued_to: UNKNOWN.to_string(),
            valid_from: UNKNOWN.to_string(),
            valid_until: UNKNOWN.to_string(),
            days_until_expiry: None,
            is_valid: false,
        }
    }
}

impl CertificateInfo {
    /// Builds the info for a certificate observed at `now`
    pub fn from_validity(
        issuer: Option<&str>,
        issued_to: Option<&str>,
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        // Floor division so a certificate that expired an hour ago reports -1
        let days_until_expiry = (not_after - now).num_seconds().div_euclid(86_400);

        Self {
            has_ssl: true,
            issuer: issuer.unwrap_or(UNKNOWN).to_string(),
            issued_to: issued_to.unwrap_or(UNKNOWN).to_string(),
            valid_from: not_before.format(DATE_FORMAT).to_string(),
            valid_until: not_after.format(DATE_FORMAT).to_string(),
            days_until_expiry: Some(days_until_expiry),
            is_valid: not_before <= now && now <= not_after,
        }
    }
}

/// Opens a TLS connection and reads the leaf certificate
#[derive(Clone)]
pub struct CertificateInspector {
    connector: TlsConnector,
    timeout: Duration,
    port: u16,
}

impl std::fmt::Debug for CertificateInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateInspector")
            .field("timeout", &self.timeout)
            .field("port", &self.port)
            .finish()
    }
}

impl CertificateInspector {
    /// Creates an inspector trusting the webpki root set
    ///
    /// # Arguments
    ///
    /// * `timeout` - Budget for connect plus handshake
    ///
    /// # Returns
    ///
    /// * `Ok(CertificateInspector)` - Inspector connecting to port 443
    /// * `Err(InspectError::TlsConfig)` - The TLS provider rejected the default protocol versions
    pub fn new(timeout: Duration) -> Result<Self, InspectError> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let provider = Arc::new(tokio_rustls::rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| InspectError::TlsConfig(e.to_string()))?
            .with_root_certificates(roots)
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            timeout,
            port: 443,
        })
    }

    /// Overrides the port (443 by default)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Inspects a domain's certificate, never failing
    pub async fn inspect(&self, domain: &str) -> CertificateInfo {
        match self.try_inspect(domain).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Certificate inspection failed for {}: {}", domain, e);
                CertificateInfo::default()
            }
        }
    }

    /// Connects, completes a verified handshake and parses the leaf certificate
    pub async fn try_inspect(&self, domain: &str) -> Result<CertificateInfo, InspectError> {
        let server_name = ServerName::try_from(domain.to_string())
            .map_err(|_| InspectError::InvalidServerName(domain.to_string()))?;

        let handshake = async move {
            let stream = TcpStream::connect((domain, self.port)).await?;
            let tls = self.connector.connect(server_name, stream).await?;
            let (_, session) = tls.get_ref();
            let leaf = session
                .peer_certificates()
                .and_then(|certs| certs.first())
                .ok_or(InspectError::NoPeerCertificate)?;
            Ok::<_, InspectError>(leaf.as_ref().to_vec())
        };

        let der = tokio::time::timeout(self.timeout, handshake)
            .await
            .map_err(|_| InspectError::Timeout("TLS handshake"))??;

        let info = parse_certificate(&der, Utc::now())?;
        tracing::debug!(
            "Certificate for {} issued by {} valid until {}",
            domain,
            info.issuer,
            info.valid_until
        );
        Ok(info)
    }
}

/// Extracts issuer, subject and validity from a DER certificate
pub fn parse_certificate(der: &[u8], now: DateTime<Utc>) -> Result<CertificateInfo, InspectError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| InspectError::Certificate(e.to_string()))?;

    let issuer = cert
        .issuer()
        .iter_organization()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .or_else(|| {
            cert.issuer()
                .iter_common_name()
                .next()
                .and_then(|attr| attr.as_str().ok())
        });

    let issued_to = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok());

    let validity = cert.validity();
    let not_before = DateTime::<Utc>::from_timestamp(validity.not_before.timestamp(), 0)
        .ok_or_else(|| InspectError::Certificate("notBefore out of range".to_string()))?;
    let not_after = DateTime::<Utc>::from_timestamp(validity.not_after.timestamp(), 0)
        .ok_or_else(|| InspectError::Certificate("notAfter out of range".to_string()))?;

    Ok(CertificateInfo::from_validity(
        issuer, issued_to, not_before, not_after, now,
    ))
}
