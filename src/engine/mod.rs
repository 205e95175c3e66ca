//! Engine orchestrator
//!
//! `Engine::check` composes normalization, the page fetch, SEO extraction,
//! the registration chain and the enabled inspectors into one report.
//! `Engine::crawl` is the separate sitemap entry point; it shares only the
//! fetcher and the scheme handling with `check`.

mod report;
mod status;

pub use report::{format_duration, CheckResult, CrawlResult, DomainInfo};
pub use status::SiteStatus;

use crate::config::Config;
use crate::crawler::{build_http_client, Crawler, PageFetcher};
use crate::inspect::{ArchiveResolver, CertificateInspector, DnsInspector};
use crate::registration::RegistrationResolver;
use crate::seo::extract_seo;
use crate::url::{apply_scheme, normalize_target};
use reqwest::Client;
use std::time::Instant;

/// Site intelligence engine
///
/// Holds only read-only configuration and thread-safe clients, so one
/// engine may serve concurrent checks.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    fetcher: PageFetcher,
    crawler: Crawler,
    registration: RegistrationResolver,
    certificate: Option<CertificateInspector>,
    dns: Option<DnsInspector>,
    archive: Option<ArchiveResolver>,
}

impl Engine {
    /// Creates an engine with a fresh HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(Engine)` - Engine ready to check and crawl
    /// * `Err(ScopeError)` - The HTTP client or TLS context could not be built
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = build_http_client()?;
        Self::with_client(config, client)
    }

    /// Creates an engine around an existing HTTP client
    ///
    /// The registration chain and the inspectors follow the configuration.
    pub fn with_client(config: Config, client: Client) -> crate::Result<Self> {
        let engine_config = &config.engine;
        let inspectors = &config.inspectors;

        let fetcher = PageFetcher::new(client.clone());
        let crawler = Crawler::new(
            fetcher.clone(),
            config.user_agent.crawler.clone(),
            engine_config.crawl_timeout(),
        );
        let registration = RegistrationResolver::from_config(&config, client.clone());

        let certificate = if inspectors.certificate {
            Some(CertificateInspector::new(engine_config.inspect_timeout())?)
        } else {
            None
        };
        let dns = inspectors
            .dns
            .then(|| DnsInspector::new(engine_config.inspect_timeout()));
        let archive = inspectors.archive.then(|| {
            ArchiveResolver::new(
                client,
                inspectors.archive_endpoint.clone(),
                config.user_agent.lookup.clone(),
                engine_config.inspect_timeout(),
            )
        });

        tracing::debug!(
            "Engine ready: registration chain {:?}, certificate={}, dns={}, archive={}",
            registration.provider_names(),
            certificate.is_some(),
            dns.is_some(),
            archive.is_some()
        );

        Ok(Self {
            config,
            fetcher,
            crawler,
            registration,
            certificate,
            dns,
            archive,
        })
    }

    /// Replaces the registration chain
    pub fn with_registration(mut self, registration: RegistrationResolver) -> Self {
        self.registration = registration;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks one site and returns the full report
    ///
    /// Never fails. Rejected input yields an `Invalid URL`/`Invalid Domain`
    /// result with empty sections; every later failure is absorbed into the
    /// status or into "Unknown"/default section values.
    pub async fn check(&self, url: &str) -> CheckResult {
        let started = Instant::now();

        let target = match normalize_target(url) {
            Ok(target) => target,
            Err(e) => {
                tracing::info!("Rejected {}: {}", url, e);
                return CheckResult::rejected(url, SiteStatus::from(&e), started.elapsed());
            }
        };
        let domain = target.registrable_domain.as_str();
        tracing::info!("Checking {} (domain {})", target.url, domain);

        let (status, seo) = match self
            .fetcher
            .fetch(
                target.url.as_str(),
                &self.config.user_agent.checker,
                self.config.engine.check_timeout(),
            )
            .await
        {
            Ok(page) => {
                let seo = (page.is_success() && page.is_html()).then(|| extract_seo(&page.body));
                (SiteStatus::Working(page.status_code), seo)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                (SiteStatus::from(&e), None)
            }
        };

        let domain_info = self.inspect_domain(domain).await;

        let result = CheckResult {
            url: url.to_string(),
            status,
            domain_info,
            seo,
            duration: format_duration(started.elapsed()),
        };
        tracing::info!("Checked {}: {} in {}", url, result.status, result.duration);
        result
    }

    /// Runs the registration chain and the enabled inspectors concurrently
    pub async fn inspect_domain(&self, domain: &str) -> DomainInfo {
        let certificate = async {
            match &self.certificate {
                Some(inspector) => Some(inspector.inspect(domain).await),
                None => None,
            }
        };
        let dns = async {
            match &self.dns {
                Some(inspector) => Some(inspector.inspect(domain).await),
                None => None,
            }
        };
        let archive = async {
            match &self.archive {
                Some(resolver) => Some(resolver.inspect(domain).await),
                None => None,
            }
        };

        let (registration, certificate, dns, archive) = tokio::join!(
            self.registration.resolve(domain),
            certificate,
            dns,
            archive
        );

        DomainInfo {
            registration: Some(registration),
            certificate,
            dns,
            archive,
        }
    }

    /// Crawls a site for same-host URLs, at most `max_pages` of them
    ///
    /// Input without a scheme gets `http://`. Never fails; the result is
    /// sorted.
    pub async fn crawl(&self, url: &str, max_pages: usize) -> CrawlResult {
        let start_url = apply_scheme(url);
        let visited = self.crawler.crawl(&start_url, max_pages).await;
        tracing::info!("Crawl of {} found {} URLs", start_url, visited.len());

        CrawlResult {
            urls: visited.into_iter().collect(),
        }
    }
}
