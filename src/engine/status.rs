use crate::crawler::FetchError;
use crate::UrlError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Reachability classification of a checked site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteStatus {
    /// The input is not a well-formed absolute URL
    InvalidUrl,
    /// No registrable domain could be extracted
    InvalidDomain,
    /// The page fetch ran out of time
    Timeout,
    /// Any other network failure
    NotWorking,
    /// The server answered with this HTTP status
    Working(u16),
}

impl SiteStatus {
    /// True if the server answered at all, whatever the status code
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working(_))
    }
}

impl From<&UrlError> for SiteStatus {
    fn from(error: &UrlError) -> Self {
        match error {
            UrlError::InvalidUrl(_) => Self::InvalidUrl,
            UrlError::InvalidDomain(_) => Self::InvalidDomain,
        }
    }
}

impl From<&FetchError> for SiteStatus {
    fn from(error: &FetchError) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::NotWorking
        }
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => f.write_str("Invalid URL"),
            Self::InvalidDomain => f.write_str("Invalid Domain"),
            Self::Timeout => f.write_str("Not Working (Timeout)"),
            Self::NotWorking => f.write_str("Not Working"),
            Self::Working(code) => write!(f, "Working ({})", code),
        }
    }
}

impl Serialize for SiteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
