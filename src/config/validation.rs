use crate::config::types::{
    Config, EngineConfig, InspectorConfig, RegistrationConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine_config(&config.engine)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_inspector_config(&config.inspectors)?;
    validate_registration_config(&config.registration)?;
    Ok(())
}

/// Validates timeouts and the crawl budget
fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    let timeouts = [
        ("check-timeout-secs", config.check_timeout_secs),
        ("crawl-timeout-secs", config.crawl_timeout_secs),
        ("inspect-timeout-secs", config.inspect_timeout_secs),
        ("provider-timeout-secs", config.provider_timeout_secs),
    ];

    for (name, value) in timeouts {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1 second, got 0",
                name
            )));
        }
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates user agent strings
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("checker", &config.checker),
        ("crawler", &config.crawler),
        ("lookup", &config.lookup),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "user-agent.{} cannot be empty",
                name
            )));
        }
    }
    Ok(())
}

fn validate_inspector_config(config: &InspectorConfig) -> Result<(), ConfigError> {
    validate_endpoint("archive-endpoint", &config.archive_endpoint)
}

/// Validates provider endpoints and the optional API key
fn validate_registration_config(config: &RegistrationConfig) -> Result<(), ConfigError> {
    if config.whois_server.trim().is_empty() {
        return Err(ConfigError::Validation(
            "whois-server cannot be empty".to_string(),
        ));
    }

    validate_endpoint("rdap-endpoint", &config.rdap_endpoint)?;
    validate_endpoint("api-endpoint", &config.api_endpoint)?;

    // An absent key is fine; an empty one is almost certainly a mistake
    if let Some(key) = &config.api_key {
        if key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api-key is set but empty; remove it to disable the WHOIS API".to_string(),
            ));
        }
    }

    Ok(())
}

/// Endpoints must be absolute HTTP(S) URLs
fn validate_endpoint(name: &str, endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            name,
            url.scheme()
        )));
    }

    Ok(())
}
