use std::fmt;

use async_trait::async_trait;

use super::types::CountryRecord;

/// Errors that can occur while talking to the country data API.
/// No variant is retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Base URL or query could not form a valid request URL.
    InvalidUrl(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned a non-success status. 404 means "no match".
    Api { status: u16, message: String },
    /// Response body was not the expected JSON shape.
    Parse(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Api { status: 404, .. })
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// A read-only source of country records.
///
/// Every call is single-shot: callers must treat it as fallible and
/// asynchronous, and must not expect any retry underneath.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Returns the name of the source (for logs).
    fn name(&self) -> &str;

    /// Every known country.
    async fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchError>;

    /// Countries whose name contains `query`.
    async fn fetch_by_name(&self, query: &str) -> Result<Vec<CountryRecord>, FetchError>;

    /// Countries whose name matches `name` exactly.
    async fn fetch_by_full_name(&self, name: &str) -> Result<Vec<CountryRecord>, FetchError>;

    /// The country (or countries) with the given 2- or 3-letter code.
    async fn fetch_by_code(&self, code: &str) -> Result<Vec<CountryRecord>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_only_for_404() {
        let not_found = FetchError::Api {
            status: 404,
            message: "Not Found".into(),
        };
        assert!(not_found.is_not_found());
        assert!(!FetchError::Api {
            status: 500,
            message: "boom".into()
        }
        .is_not_found());
        assert!(!FetchError::Network("refused".into()).is_not_found());
    }

    #[test]
    fn test_display() {
        let err = FetchError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): unavailable");
        assert_eq!(
            FetchError::Network("timed out".into()).to_string(),
            "network error: timed out"
        );
    }
}
