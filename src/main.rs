//! Sumi-Scope main entry point
//!
//! This is the command-line interface for the Sumi-Scope site intelligence engine.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use sumi_scope::config::{load_config_with_hash, validate, Config};
use sumi_scope::output::{format_markdown_report, format_sitemap, to_json, write_output};
use sumi_scope::Engine;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when the config leaves `api-key` unset
const API_KEY_ENV: &str = "WHOIS_API_KEY";

/// Sumi-Scope: a domain and site intelligence engine
///
/// Sumi-Scope checks a website's reachability, SEO metadata, registration
/// data, TLS certificate, DNS records and approximate age, and builds
/// sitemaps by crawling same-site links.
#[derive(Parser, Debug)]
#[command(name = "sumi-scope")]
#[command(version = "1.0.0")]
#[command(about = "A domain and site intelligence engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Validate config and show the effective settings without running
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check one site and print its report
    Check {
        /// URL or bare domain to check
        url: String,

        #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Crawl a site for same-host URLs
    Crawl {
        /// URL or bare domain to start from
        url: String,

        /// Maximum number of pages to visit (config `max-pages` by default)
        #[arg(long)]
        max_pages: Option<usize>,

        #[arg(long, value_enum, default_value_t = CrawlFormat::Json)]
        format: CrawlFormat,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CrawlFormat {
    Json,
    Sitemap,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(cli.config.as_ref())?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let Some(command) = cli.command else {
        anyhow::bail!("no command given; try `sumi-scope check <URL>` or `sumi-scope crawl <URL>`");
    };

    let engine = Engine::new(config).context("Failed to initialise engine")?;

    match command {
        Command::Check {
            url,
            format,
            output,
        } => {
            let result = engine.check(&url).await;
            let rendered = match format {
                ReportFormat::Json => to_json(&result)?,
                ReportFormat::Markdown => format_markdown_report(&result),
            };
            write_output(&rendered, output.as_deref())?;
        }
        Command::Crawl {
            url,
            max_pages,
            format,
            output,
        } => {
            let max_pages = max_pages.unwrap_or(engine.config().engine.max_pages);
            let result = engine.crawl(&url, max_pages).await;
            let rendered = match format {
                CrawlFormat::Json => to_json(&result)?,
                CrawlFormat::Sitemap => format_sitemap(&result),
            };
            write_output(&rendered, output.as_deref())?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scope=info,warn"),
            1 => EnvFilter::new("sumi_scope=debug,info"),
            2 => EnvFilter::new("sumi_scope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and fills the API key from the environment
fn load_effective_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if config.registration.api_key.is_none() {
        config.registration.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Sumi-Scope Dry Run ===\n");

    println!("Engine:");
    println!("  Check timeout: {}s", config.engine.check_timeout_secs);
    println!("  Crawl timeout: {}s", config.engine.crawl_timeout_secs);
    println!("  Inspect timeout: {}s", config.engine.inspect_timeout_secs);
    println!("  Provider timeout: {}s", config.engine.provider_timeout_secs);
    println!("  Max pages: {}", config.engine.max_pages);

    println!("\nUser Agents:");
    println!("  Checker: {}", config.user_agent.checker);
    println!("  Crawler: {}", config.user_agent.crawler);
    println!("  Lookup: {}", config.user_agent.lookup);

    println!("\nInspectors:");
    println!("  Certificate: {}", on_off(config.inspectors.certificate));
    println!("  DNS: {}", on_off(config.inspectors.dns));
    println!(
        "  Archive: {} ({})",
        on_off(config.inspectors.archive),
        config.inspectors.archive_endpoint
    );

    let registration = &config.registration;
    println!("\nRegistration chain:");
    if registration.whois {
        println!("  1. WHOIS via {}", registration.whois_server);
    }
    if registration.rdap {
        println!("  2. RDAP via {}", registration.rdap_endpoint);
    }
    if registration.api_key.is_some() {
        println!("  3. WHOIS API via {}", registration.api_endpoint);
    } else {
        println!("  (WHOIS API disabled: no API key)");
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
