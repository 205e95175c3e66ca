use crate::inspect::InspectError;
use chrono::{NaiveDate, Utc};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Asking for the capture closest to this date yields the earliest one
const EARLIEST_TIMESTAMP: &str = "19960101";

/// Whether an archived capture was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveStatus {
    Found,
    NotFound,
}

/// Approximate domain age from its earliest archived capture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveAge {
    /// Capture date as `YYYY-MM-DD`
    pub first_seen: Option<String>,
    pub age_days: Option<i64>,
    /// `age_days / 365.25`, rounded to one decimal
    pub age_years: Option<f64>,
    pub status: ArchiveStatus,
}

impl Default for ArchiveAge {
    fn default() -> Self {
        Self::not_found()
    }
}

impl ArchiveAge {
    pub fn not_found() -> Self {
        Self {
            first_seen: None,
            age_days: None,
            age_years: None,
            status: ArchiveStatus::NotFound,
        }
    }

    /// Computes the age from a capture timestamp (`YYYYMMDD...`) as seen on `today`
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use sumi_scope::inspect::ArchiveAge;
    ///
    /// let today = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    /// let age = ArchiveAge::from_timestamp("20100101120000", today).unwrap();
    /// assert_eq!(age.first_seen.as_deref(), Some("2010-01-01"));
    /// assert_eq!(age.age_days, Some(3652));
    /// assert_eq!(age.age_years, Some(10.0));
    /// ```
    pub fn from_timestamp(timestamp: &str, today: NaiveDate) -> Result<Self, InspectError> {
        let date = timestamp
            .get(..8)
            .filter(|prefix| prefix.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y%m%d").ok())
            .ok_or_else(|| InspectError::BadTimestamp(timestamp.to_string()))?;

        let age_days = (today - date).num_days();
        let age_years = (age_days as f64 / 365.25 * 10.0).round() / 10.0;

        Ok(Self {
            first_seen: Some(date.format("%Y-%m-%d").to_string()),
            age_days: Some(age_days),
            age_years: Some(age_years),
            status: ArchiveStatus::Found,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<Snapshot>,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    timestamp: Option<String>,
}

/// Queries a Wayback-style availability API for the earliest capture
#[derive(Debug, Clone)]
pub struct ArchiveResolver {
    client: Client,
    endpoint: String,
    user_agent: String,
    timeout: Duration,
}

impl ArchiveResolver {
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `endpoint` - Availability endpoint, e.g. `https://archive.org/wayback/available`
    /// * `user_agent` - User-Agent for the lookup
    /// * `timeout` - Request timeout
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

    /// Looks up the domain's age, never failing
    pub async fn inspect(&self, domain: &str) -> ArchiveAge {
        match self.try_inspect(domain).await {
            Ok(age) => age,
            Err(e) => {
                tracing::warn!("Archive lookup failed for {}: {}", domain, e);
                ArchiveAge::not_found()
            }
        }
    }

    /// Looks up the domain's age
    ///
    /// # Returns
    ///
    /// * `Ok(ArchiveAge)` - A capture was found (status `found`)
    /// * `Err(InspectError::NoCapture)` - The service knows no capture
    /// * `Err(InspectError)` - Network, HTTP status, body or timestamp failure
    pub async fn try_inspect(&self, domain: &str) -> Result<ArchiveAge, InspectError> {
        let response: AvailabilityResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("url", domain), ("timestamp", EARLIEST_TIMESTAMP)])
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let timestamp = response
            .archived_snapshots
            .closest
            .and_then(|snapshot| snapshot.timestamp)
            .ok_or(InspectError::NoCapture)?;

        tracing::debug!("Earliest capture of {} at {}", domain, timestamp);
        ArchiveAge::from_timestamp(&timestamp, Utc::now().date_naive())
    }
}
