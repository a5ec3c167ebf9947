//! Error types for price lookups.

use thiserror::Error;

/// Errors that can occur while looking up a price.
///
/// Every variant means the same thing to a caller: no quote this run.
/// The variants only differ in how they are logged.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("No price found for '{0}'")]
    NotFound(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::ParseError(err.to_string())
        } else {
            FeedError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}

impl FeedError {
    /// True when the service answered but had no entry for the key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FeedError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FeedError::NotFound("doge".to_string()).to_string(),
            "No price found for 'doge'"
        );
        assert_eq!(FeedError::HttpStatus(429).to_string(), "HTTP status 429");
    }

    #[test]
    fn test_json_error_is_parse_error() {
        let err: FeedError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, FeedError::ParseError(_)));
        assert!(!err.is_not_found());
    }
}
