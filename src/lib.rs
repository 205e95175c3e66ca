//! Sumi-Scope: a domain and site intelligence engine
//!
//! This crate inspects a public website and produces a structured report:
//! reachability, on-page SEO metadata with a derived score, registration data,
//! TLS certificate health, DNS presence and approximate domain age. It also
//! builds a best-effort sitemap by crawling same-site links.

pub mod config;
pub mod crawler;
pub mod engine;
pub mod inspect;
pub mod output;
pub mod registration;
pub mod seo;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Scope operations
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Inspector setup error: {0}")]
    Inspect(#[from] inspect::InspectError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
///
/// These are the only failures that short-circuit a check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// Result type alias for Sumi-Scope operations
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CheckResult, CrawlResult, DomainInfo, Engine, SiteStatus};
pub use url::{normalize_target, NormalizedTarget};
