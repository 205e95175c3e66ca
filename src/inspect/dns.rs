use crate::inspect::InspectError;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// DNS presence of a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DnsSnapshot {
    pub ip_addresses: Vec<String>,
    pub mail_servers: Vec<String>,
    pub nameservers: Vec<String>,
    pub has_a_record: bool,
    pub has_mx_record: bool,
    pub has_ns_record: bool,
}

impl DnsSnapshot {
    /// Builds a snapshot; presence flags follow the lists
    pub fn from_records(
        ip_addresses: Vec<String>,
        mail_servers: Vec<String>,
        nameservers: Vec<String>,
    ) -> Self {
        Self {
            has_a_record: !ip_addresses.is_empty(),
            has_mx_record: !mail_servers.is_empty(),
            has_ns_record: !nameservers.is_empty(),
            ip_addresses,
            mail_servers,
            nameservers,
        }
    }
}

/// Resolves A, MX and NS records
#[derive(Clone)]
pub struct DnsInspector {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl std::fmt::Debug for DnsInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsInspector")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DnsInspector {
    /// Creates an inspector using the default upstream resolvers
    ///
    /// One attempt per query; `timeout` bounds each record type separately.
    pub fn new(timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;
        opts.use_hosts_file = false;

        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
            timeout,
        }
    }

    /// Queries all three record types; a failing type leaves its list empty
    pub async fn inspect(&self, domain: &str) -> DnsSnapshot {
        let (ips, mx, ns) = tokio::join!(
            self.lookup_a(domain),
            self.lookup_mx(domain),
            self.lookup_ns(domain)
        );

        DnsSnapshot::from_records(
            or_empty(domain, "A", ips),
            or_empty(domain, "MX", mx),
            or_empty(domain, "NS", ns),
        )
    }

    /// IPv4 addresses of the domain
    pub async fn lookup_a(&self, domain: &str) -> Result<Vec<String>, InspectError> {
        let lookup = self
            .bounded("A lookup", self.resolver.ipv4_lookup(fqdn(domain)))
            .await?;
        Ok(lookup.iter().map(|a| a.to_string()).collect())
    }

    /// Mail exchangers in answer order
    pub async fn lookup_mx(&self, domain: &str) -> Result<Vec<String>, InspectError> {
        let lookup = self
            .bounded("MX lookup", self.resolver.mx_lookup(fqdn(domain)))
            .await?;
        Ok(lookup
            .iter()
            .map(|mx| host_name(&mx.exchange().to_string()))
            .collect())
    }

    /// Authoritative nameservers
    pub async fn lookup_ns(&self, domain: &str) -> Result<Vec<String>, InspectError> {
        let lookup = self
            .bounded("NS lookup", self.resolver.ns_lookup(fqdn(domain)))
            .await?;
        Ok(lookup.iter().map(|ns| host_name(&ns.to_string())).collect())
    }

    async fn bounded<T, E, F>(&self, what: &'static str, query: F) -> Result<T, InspectError>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        tokio::time::timeout(self.timeout, query)
            .await
            .map_err(|_| InspectError::Timeout(what))?
            .map_err(|e| InspectError::Dns(e.to_string()))
    }
}

fn or_empty(domain: &str, record: &str, result: Result<Vec<String>, InspectError>) -> Vec<String> {
    result.unwrap_or_else(|e| {
        tracing::debug!("No {} records for {}: {}", record, domain, e);
        Vec::new()
    })
}

/// Absolute name so no search domain is appended
fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{}.", domain)
    }
}

/// Host name without the trailing root dot
fn host_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}
