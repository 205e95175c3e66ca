//! Registration resolver
//!
//! Registration data comes from an ordered chain of providers:
//! 1. WHOIS protocol (referral from a root server)
//! 2. RDAP over HTTPS
//! 3. A commercial WHOIS API, only when an API key is configured
//!
//! The first provider yielding a registrar or a registration date wins.
//! Provider failures are logged and never leave the resolver.

mod api;
mod dates;
mod rdap;
mod whois;

pub use api::{parse_api_answer, WhoisApiProvider};
pub use dates::{format_json_date, format_registry_date, format_unix_seconds};
pub use rdap::{RdapDomain, RdapEntity, RdapEvent, RdapProvider};
pub use whois::{find_referral, parse_whois, WhoisProvider};

use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

pub(crate) const UNKNOWN: &str = "Unknown";

/// Registration data of a domain; absent fields hold "Unknown"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRecord {
    pub domain: String,
    pub registrar: String,
    /// `YYYY-MM-DD HH:MM:SS`, or the raw value if it was not ISO-like
    pub registered_on: String,
    pub expires_on: String,
    pub updated_on: String,
}

impl RegistrationRecord {
    /// A record with every field except `domain` set to "Unknown"
    pub fn unknown(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            registrar: UNKNOWN.to_string(),
            registered_on: UNKNOWN.to_string(),
            expires_on: UNKNOWN.to_string(),
            updated_on: UNKNOWN.to_string(),
        }
    }

    /// True if a registrar or a registration date is known
    pub fn is_usable(&self) -> bool {
        self.registrar != UNKNOWN || self.registered_on != UNKNOWN
    }
}

/// Failure of a single provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} lookup timed out")]
    Timeout(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No WHOIS server known for {0}")]
    NoWhoisServer(String),

    #[error("API error: {0}")]
    Api(String),
}

/// One source of registration data
#[async_trait]
pub trait RegistrationProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Looks up a registrable domain
    ///
    /// `Ok` may still carry an all-"Unknown" record when the source answered
    /// without usable data.
    async fn try_resolve(&self, domain: &str) -> Result<RegistrationRecord, ProviderError>;
}

/// Ordered provider chain
#[derive(Clone, Default)]
pub struct RegistrationResolver {
    providers: Vec<Arc<dyn RegistrationProvider>>,
}

impl std::fmt::Debug for RegistrationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationResolver")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl RegistrationResolver {
    /// Creates a resolver trying `providers` in order
    pub fn new(providers: Vec<Arc<dyn RegistrationProvider>>) -> Self {
        Self { providers }
    }

    /// Builds the chain the configuration enables
    ///
    /// The API provider joins only when an API key is set.
    pub fn from_config(config: &Config, client: Client) -> Self {
        let registration = &config.registration;
        let timeout = config.engine.provider_timeout();
        let user_agent = &config.user_agent.lookup;
        let mut providers: Vec<Arc<dyn RegistrationProvider>> = Vec::new();

        if registration.whois {
            providers.push(Arc::new(WhoisProvider::new(
                registration.whois_server.clone(),
                timeout,
            )));
        }

        if registration.rdap {
            providers.push(Arc::new(RdapProvider::new(
                client.clone(),
                registration.rdap_endpoint.clone(),
                user_agent.clone(),
                timeout,
            )));
        }

        if let Some(api_key) = &registration.api_key {
            providers.push(Arc::new(WhoisApiProvider::new(
                client,
                registration.api_endpoint.clone(),
                api_key.clone(),
                user_agent.clone(),
                timeout,
            )));
        }

        Self::new(providers)
    }

    /// Names of the providers, in the order they are tried
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolves a domain through the chain
    ///
    /// Returns the first usable record; if no provider has one, a record
    /// with every field "Unknown".
    pub async fn resolve(&self, domain: &str) -> RegistrationRecord {
        for provider in &self.providers {
            match provider.try_resolve(domain).await {
                Ok(record) if record.is_usable() => {
                    tracing::debug!("Registration for {} resolved by {}", domain, provider.name());
                    return RegistrationRecord {
                        domain: domain.to_string(),
                        ..record
                    };
                }
                Ok(_) => {
                    tracing::debug!("{} returned no usable data for {}", provider.name(), domain);
                }
                Err(e) => {
                    tracing::warn!("{} lookup failed for {}: {}", provider.name(), domain, e);
                }
            }
        }

        tracing::info!("No registration data found for {}", domain);
        RegistrationRecord::unknown(domain)
    }
}
