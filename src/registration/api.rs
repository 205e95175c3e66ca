use crate::registration::dates::{format_json_date, json_text};
use crate::registration::{ProviderError, RegistrationProvider, RegistrationRecord};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Commercial WHOIS API lookup (WhoisXML `WhoisService` interface)
#[derive(Clone)]
pub struct WhoisApiProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    user_agent: String,
    timeout: Duration,
}

impl std::fmt::Debug for WhoisApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhoisApiProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WhoisApiProvider {
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `endpoint` - Service URL; query parameters are appended
    /// * `api_key` - Account key sent as `apiKey`
    /// * `user_agent` - User-Agent for the lookup
    /// * `timeout` - Request timeout
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

#[async_trait]
impl RegistrationProvider for WhoisApiProvider {
    fn name(&self) -> &'static str {
        "whois-api"
    }

    async fn try_resolve(&self, domain: &str) -> Result<RegistrationRecord, ProviderError> {
        let answer: Value = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("domainName", domain),
                ("outputFormat", "JSON"),
            ])
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_api_answer(domain, &answer)
    }
}

/// Converts an API answer into a registration record
///
/// Two shapes are understood: the WhoisXML `WhoisRecord` object (falling
/// back to its `registryData` for missing fields) and a flat object with
/// `registrar`/`creation_date`/`expiration_date`/`updated_date`, where
/// dates may be Unix seconds or lists. An `ErrorMessage` body is an error.
pub fn parse_api_answer(domain: &str, answer: &Value) -> Result<RegistrationRecord, ProviderError> {
    if let Some(error) = answer.get("ErrorMessage") {
        let message = error
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("unspecified error");
        return Err(ProviderError::Api(message.to_string()));
    }

    let mut record = RegistrationRecord::unknown(domain);

    match answer.get("WhoisRecord") {
        Some(whois) => {
            let registry = whois.get("registryData");
            let field = |key: &str| {
                whois
                    .get(key)
                    .filter(|v| !v.is_null())
                    .or_else(|| registry.and_then(|r| r.get(key)))
            };

            if let Some(name) = json_text(field("registrarName")) {
                record.registrar = name;
            }
            record.registered_on = format_json_date(field("createdDate"));
            record.expires_on = format_json_date(field("expiresDate"));
            record.updated_on = format_json_date(field("updatedDate"));
        }
        None => {
            if let Some(name) = json_text(answer.get("registrar")) {
                record.registrar = name;
            }
            record.registered_on = format_json_date(answer.get("creation_date"));
            record.expires_on = format_json_date(answer.get("expiration_date"));
            record.updated_on = format_json_date(answer.get("updated_date"));
        }
    }

    Ok(record)
}
