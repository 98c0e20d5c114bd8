//! Client configuration.
//!
//! Every tunable the client uses lives in one `ClientConfig`:
//! - `RetryConfig`: backoff schedule for transient catalog failures
//! - `CircuitBreakerConfig`: when to stop calling a failing catalog
//! - `CacheConfig`: card cache bounds
//! - `DeckRules`: construction limits checked by the validator
//! - `HistoryConfig`: undo/redo depth
//! - search debounce
//!
//! All sections are optional in JSON; missing fields take their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{CacheConfig, CircuitBreakerConfig, RetryConfig};
use crate::deck::{DeckRules, HistoryConfig};

/// Configuration could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Complete client configuration.
///
/// ## Example
///
/// ```
/// use rust_tcg::core::ClientConfig;
///
/// let config = ClientConfig::from_json(r#"{ "retry": { "base_delay_ms": 100 } }"#).unwrap();
///
/// assert_eq!(config.retry.base_delay_ms, 100);
/// assert_eq!(config.retry.multiplier, 2.0);
/// assert_eq!(config.deck_rules.copy_limit, 4);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub retry: RetryConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub cache: CacheConfig,
    pub deck_rules: DeckRules,
    pub history: HistoryConfig,

    /// Quiet period after the last keystroke before a search is sent.
    pub search_debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            cache: CacheConfig::default(),
            deck_rules: DeckRules::default(),
            history: HistoryConfig::default(),
            search_debounce_ms: 500,
        }
    }
}

impl ClientConfig {
    /// Parse from JSON. Missing sections and fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    // === Builder ===

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_circuit_breaker(mut self, breaker: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = breaker;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_deck_rules(mut self, rules: DeckRules) -> Self {
        self.deck_rules = rules;
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce_ms = debounce.as_millis() as u64;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.retry.base_delay(), Duration::from_millis(250));
        assert_eq!(config.circuit_breaker.failure_threshold, 4);
        assert_eq!(config.cache.capacity, Some(1_024));
        assert_eq!(config.deck_rules.min_size, 60);
        assert_eq!(config.history.capacity, 100);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config.search_debounce_ms, 500);
        assert_eq!(config.deck_rules, DeckRules::default());
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "circuit_breaker": { "failure_threshold": 2 },
            "cache": { "capacity": null, "ttl_ms": 60000 },
            "deck_rules": { "min_size": 40, "max_size": 60 },
            "search_debounce_ms": 250
        }"#;
        let config = ClientConfig::from_json(json).unwrap();

        assert_eq!(config.circuit_breaker.failure_threshold, 2);
        assert_eq!(config.circuit_breaker.reset_timeout_ms, 2_000);
        assert_eq!(config.cache.capacity, None);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(60)));
        assert_eq!(config.deck_rules.min_size, 40);
        assert_eq!(config.deck_rules.copy_limit, 4);
        assert_eq!(config.search_debounce_ms, 250);
    }

    #[test]
    fn test_malformed_json() {
        let err = ClientConfig::from_json("{ retry: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ClientConfig::default()
            .with_search_debounce(Duration::from_millis(300))
            .with_history(HistoryConfig::default().with_capacity(10));
        let parsed = ClientConfig::from_json(&config.to_json().unwrap()).unwrap();

        assert_eq!(parsed.search_debounce_ms, 300);
        assert_eq!(parsed.history.capacity, 10);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{ "history": { "capacity": 5 } }"#).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.history.capacity, 5);
    }
}
