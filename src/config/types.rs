use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for Sumi-Scope
///
/// Every section is optional; a missing section takes the values of the
/// reference deployment (see the `Default` impls below).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub inspectors: InspectorConfig,
    pub registration: RegistrationConfig,
}

/// Timeouts and crawl budget
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Timeout for the primary page fetch of a check (seconds)
    #[serde(rename = "check-timeout-secs")]
    pub check_timeout_secs: u64,

    /// Timeout for each page fetched by the crawler (seconds)
    #[serde(rename = "crawl-timeout-secs")]
    pub crawl_timeout_secs: u64,

    /// Timeout for the TLS, DNS and archive inspectors (seconds)
    #[serde(rename = "inspect-timeout-secs")]
    pub inspect_timeout_secs: u64,

    /// Timeout for each registration provider (seconds)
    #[serde(rename = "provider-timeout-secs")]
    pub provider_timeout_secs: u64,

    /// Default page budget for a crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,
}

impl EngineConfig {
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl_timeout_secs)
    }

    pub fn inspect_timeout(&self) -> Duration {
        Duration::from_secs(self.inspect_timeout_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_timeout_secs: 10,
            crawl_timeout_secs: 5,
            inspect_timeout_secs: 5,
            provider_timeout_secs: 10,
            max_pages: 50,
        }
    }
}

/// User agent strings, one per outbound component
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Sent with the primary page fetch of a check
    pub checker: String,

    /// Sent with every page fetched by the crawler
    pub crawler: String,

    /// Sent to RDAP, the WHOIS API and the web archive
    pub lookup: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            checker: "WebsiteChecker/1.0".to_string(),
            crawler: "SitemapGeneratorBot/1.0".to_string(),
            lookup: "SumiScope-Registration/1.0".to_string(),
        }
    }
}

/// Which domain inspectors run during a check
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub certificate: bool,
    pub dns: bool,
    pub archive: bool,

    /// Wayback-style availability endpoint
    #[serde(rename = "archive-endpoint")]
    pub archive_endpoint: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            certificate: true,
            dns: true,
            archive: true,
            archive_endpoint: "https://archive.org/wayback/available".to_string(),
        }
    }
}

/// Registration resolver chain configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Enable the WHOIS protocol provider (TCP port 43)
    pub whois: bool,

    /// Referral root queried first; the TLD server is taken from its answer
    #[serde(rename = "whois-server")]
    pub whois_server: String,

    /// Enable the RDAP provider
    pub rdap: bool,

    /// RDAP base URL; `/domain/<name>` is appended
    #[serde(rename = "rdap-endpoint")]
    pub rdap_endpoint: String,

    /// Commercial WHOIS API endpoint
    #[serde(rename = "api-endpoint")]
    pub api_endpoint: String,

    /// Commercial WHOIS API key. When absent the API provider is not in the chain.
    #[serde(rename = "api-key", skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            whois: true,
            whois_server: "whois.iana.org".to_string(),
            rdap: true,
            rdap_endpoint: "https://rdap.org".to_string(),
            api_endpoint: "https://www.whoisxmlapi.com/whoisserver/WhoisService".to_string(),
            api_key: None,
        }
    }
}
