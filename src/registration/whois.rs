//! WHOIS protocol client (TCP port 43)
//!
//! The root server answers with a `refer:` (or `whois:`) line naming the
//! authoritative server for the TLD; that server is queried once and its
//! free-text answer is parsed.

use crate::registration::dates::format_registry_date;
use crate::registration::{ProviderError, RegistrationProvider, RegistrationRecord};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const WHOIS_PORT: u16 = 43;

/// Responses are small; anything beyond this is cut off
const MAX_RESPONSE_BYTES: u64 = 256 * 1024;

const REGISTRAR_KEYS: &[&str] = &["registrar", "sponsoring registrar", "registrar name"];

const CREATED_KEYS: &[&str] = &[
    "creation date",
    "created",
    "created on",
    "registered on",
    "registration time",
    "domain registration date",
];

const EXPIRES_KEYS: &[&str] = &[
    "registry expiry date",
    "registrar registration expiration date",
    "expiration date",
    "expiry date",
    "expires on",
    "expires",
    "paid-till",
];

const UPDATED_KEYS: &[&str] = &[
    "updated date",
    "last updated",
    "last updated on",
    "last-modified",
    "last modified",
    "changed",
];

/// Authoritative WHOIS lookup via referral from a root server
#[derive(Debug, Clone)]
pub struct WhoisProvider {
    root_server: String,
    port: u16,
    timeout: Duration,
}

impl WhoisProvider {
    /// Creates a provider starting at `root_server` (e.g. `whois.iana.org`)
    ///
    /// `timeout` bounds the whole lookup, referral included.
    pub fn new(root_server: impl Into<String>, timeout: Duration) -> Self {
        Self {
            root_server: root_server.into(),
            port: WHOIS_PORT,
            timeout,
        }
    }

    /// Overrides the port used for every query (43 by default)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    async fn lookup(&self, domain: &str) -> Result<RegistrationRecord, ProviderError> {
        let root_answer = self.query(&self.root_server, domain).await?;

        let server = find_referral(&root_answer)
            .filter(|server| !server.eq_ignore_ascii_case(&self.root_server))
            .ok_or_else(|| ProviderError::NoWhoisServer(domain.to_string()))?;

        tracing::debug!("WHOIS for {} referred to {}", domain, server);
        let answer = self.query(&server, domain).await?;

        Ok(parse_whois(domain, &answer))
    }

    async fn query(&self, server: &str, domain: &str) -> Result<String, ProviderError> {
        let mut stream = TcpStream::connect((server, self.port)).await?;
        stream.write_all(format!("{}\r\n", domain).as_bytes()).await?;

        let mut raw = Vec::new();
        stream
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut raw)
            .await?;

        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

#[async_trait]
impl RegistrationProvider for WhoisProvider {
    fn name(&self) -> &'static str {
        "whois"
    }

    async fn try_resolve(&self, domain: &str) -> Result<RegistrationRecord, ProviderError> {
        tokio::time::timeout(self.timeout, self.lookup(domain))
            .await
            .map_err(|_| ProviderError::Timeout(self.name()))?
    }
}

/// Finds the referred WHOIS server in a root server answer
pub fn find_referral(answer: &str) -> Option<String> {
    fields(answer)
        .find(|(key, value)| (key == "refer" || key == "whois") && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Parses registrar and dates out of a free-text WHOIS answer
///
/// Keys are matched case-insensitively and the first occurrence of each
/// field wins; fields that never appear stay "Unknown".
pub fn parse_whois(domain: &str, answer: &str) -> RegistrationRecord {
    let mut record = RegistrationRecord::unknown(domain);
    let mut registrar = None;
    let mut created = None;
    let mut expires = None;
    let mut updated = None;

    for (key, value) in fields(answer) {
        if value.is_empty() {
            continue;
        }
        let key = key.as_str();
        if registrar.is_none() && REGISTRAR_KEYS.contains(&key) {
            registrar = Some(value);
        } else if created.is_none() && CREATED_KEYS.contains(&key) {
            created = Some(value);
        } else if expires.is_none() && EXPIRES_KEYS.contains(&key) {
            expires = Some(value);
        } else if updated.is_none() && UPDATED_KEYS.contains(&key) {
            updated = Some(value);
        }
    }

    if let Some(name) = registrar {
        record.registrar = name.to_string();
    }
    if let Some(date) = created {
        record.registered_on = format_registry_date(date);
    }
    if let Some(date) = expires {
        record.expires_on = format_registry_date(date);
    }
    if let Some(date) = updated {
        record.updated_on = format_registry_date(date);
    }
    record
}

/// `key: value` pairs with lowercased keys; comment lines are skipped
fn fields(answer: &str) -> impl Iterator<Item = (String, &str)> + '_ {
    answer.lines().filter_map(|line| {
        let line = line.trim();
        if line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>") {
            return None;
        }
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_ascii_lowercase(), value.trim()))
    })
}
