use crate::registration::dates::format_registry_date;
use crate::registration::{ProviderError, RegistrationProvider, RegistrationRecord};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// RDAP domain object, reduced to what the record needs
#[derive(Debug, Default, Deserialize)]
pub struct RdapDomain {
    #[serde(default)]
    pub events: Vec<RdapEvent>,
    #[serde(default)]
    pub entities: Vec<RdapEntity>,
}

#[derive(Debug, Deserialize)]
pub struct RdapEvent {
    #[serde(rename = "eventAction")]
    pub event_action: String,
    #[serde(rename = "eventDate")]
    pub event_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RdapEntity {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "vcardArray")]
    pub vcard_array: Option<Value>,
}

impl RdapEntity {
    /// First `fn`, `org` or `organization` property of the jCard
    ///
    /// jCard layout: `["vcard", [[name, params, type, value], ...]]`.
    pub fn display_name(&self) -> Option<String> {
        self.vcard_array
            .as_ref()?
            .get(1)?
            .as_array()?
            .iter()
            .filter_map(|property| property.as_array())
            .find_map(|property| {
                let name = property.first()?.as_str()?;
                if !matches!(name, "fn" | "org" | "organization") {
                    return None;
                }
                match property.get(3)? {
                    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                    // Structured `org` values are lists of units
                    Value::Array(units) => units
                        .first()
                        .and_then(|u| u.as_str())
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| s.trim().to_string()),
                    _ => None,
                }
            })
    }
}

impl RdapDomain {
    /// Converts the RDAP answer into a registration record
    ///
    /// Dates: the first event whose action contains "registration" sets the
    /// creation date, "expiration" the expiry date, and "last" or "update" the
    /// update date. The registrar comes from the entity with the `registrar`
    /// role, or the first entity if none carries it; this is best-effort.
    pub fn into_record(self, domain: &str) -> RegistrationRecord {
        let mut record = RegistrationRecord::unknown(domain);

        if let Some(date) = first_event_date(&self.events, |action| action.contains("registration")) {
            record.registered_on = date;
        }
        if let Some(date) = first_event_date(&self.events, |action| action.contains("expiration")) {
            record.expires_on = date;
        }
        if let Some(date) = first_event_date(&self.events, |action| {
            action.contains("last") || action.contains("update")
        }) {
            record.updated_on = date;
        }

        let registrar_entity = self
            .entities
            .iter()
            .find(|entity| entity.roles.iter().any(|role| role == "registrar"))
            .or_else(|| self.entities.first());
        if let Some(name) = registrar_entity.and_then(RdapEntity::display_name) {
            record.registrar = name;
        }

        record
    }
}

/// Formatted date of the first dated event whose lowercased action matches
fn first_event_date(events: &[RdapEvent], wanted: impl Fn(&str) -> bool) -> Option<String> {
    events
        .iter()
        .filter(|event| wanted(&event.event_action.to_ascii_lowercase()))
        .find_map(|event| event.event_date.as_deref())
        .map(format_registry_date)
}

/// RDAP-over-HTTPS lookup (`{endpoint}/domain/{domain}`)
#[derive(Debug, Clone)]
pub struct RdapProvider {
    client: Client,
    endpoint: String,
    user_agent: String,
    timeout: Duration,
}

impl RdapProvider {
    /// Creates a provider against an RDAP base URL such as `https://rdap.org`
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    fn domain_url(&self, domain: &str) -> String {
        format!("{}/domain/{}", self.endpoint.trim_end_matches('/'), domain)
    }
}

#[async_trait]
impl RegistrationProvider for RdapProvider {
    fn name(&self) -> &'static str {
        "rdap"
    }

    async fn try_resolve(&self, domain: &str) -> Result<RegistrationRecord, ProviderError> {
        let answer: RdapDomain = self
            .client
            .get(self.domain_url(domain))
            .header(ACCEPT, "application/rdap+json, application/json")
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(answer.into_record(domain))
    }
}
