//! Configuration module for Sumi-Scope
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `Config::default()` describes the reference
//! deployment and every section of a file falls back to it.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scope::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scope.toml")).unwrap();
//! println!("Crawl budget: {}", config.engine.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, EngineConfig, InspectorConfig, RegistrationConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
