//! Error types raised by catalog lookups.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by catalog clients and the resilience layers around them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Transport failure. Transient: the retry layer tries again.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with something that is not a card.
    #[error("decode error: {0}")]
    Decode(String),

    /// The circuit breaker is open; the call was not attempted.
    #[error("circuit open, retry after {retry_after:?}")]
    CircuitOpen { retry_after: Duration },

    /// The request was superseded before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl CatalogError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_errors_are_transient() {
        assert!(CatalogError::Network("reset".into()).is_transient());
        assert!(!CatalogError::Decode("bad json".into()).is_transient());
        assert!(!CatalogError::CircuitOpen { retry_after: Duration::from_secs(1) }.is_transient());
        assert!(!CatalogError::Cancelled.is_transient());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CatalogError::Network("timed out".into()).to_string(),
            "network error: timed out"
        );
        assert_eq!(CatalogError::Cancelled.to_string(), "request cancelled");
    }
}
