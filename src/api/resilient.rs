//! Retry and circuit breaking around a catalog client.
//!
//! Layering: the circuit breaker is outside, retry is inside.
//!
//! ```text
//! caller -> CircuitBreaker -> RetryPolicy -> CardCatalogClient
//! ```
//!
//! One logical call (with all its retries) counts as one success or one
//! failure for the breaker, so a sustained outage trips the breaker after
//! `failure_threshold` exhausted calls instead of resetting on every attempt.

use async_trait::async_trait;

use super::cancel::Cancellation;
use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use super::client::CardCatalogClient;
use super::error::Result;
use super::retry::{RetryConfig, RetryPolicy};
use crate::cards::{Card, CardId};

/// A `CardCatalogClient` with retry and circuit breaking.
#[derive(Debug)]
pub struct ResilientClient<C> {
    inner: C,
    retry: RetryPolicy,
    breaker: CircuitBreaker,
}

impl<C: CardCatalogClient> ResilientClient<C> {
    /// Wrap `inner` with the default retry schedule and breaker settings.
    pub fn new(inner: C) -> Self {
        Self::with_config(inner, RetryConfig::default(), CircuitBreakerConfig::default())
    }

    pub fn with_config(inner: C, retry: RetryConfig, breaker: CircuitBreakerConfig) -> Self {
        Self {
            inner,
            retry: RetryPolicy::new(retry),
            breaker: CircuitBreaker::new(breaker),
        }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// `search`, abandoning retries once `cancel` fires.
    pub async fn search_with_cancel(&self, query: &str, cancel: &Cancellation) -> Result<Vec<Card>> {
        self.breaker
            .call(|| self.retry.run(cancel, || self.inner.search(query)))
            .await
    }

    /// `get_by_id`, abandoning retries once `cancel` fires.
    pub async fn get_by_id_with_cancel(
        &self,
        id: &CardId,
        cancel: &Cancellation,
    ) -> Result<Option<Card>> {
        self.breaker
            .call(|| self.retry.run(cancel, || self.inner.get_by_id(id)))
            .await
    }
}

#[async_trait]
impl<C: CardCatalogClient> CardCatalogClient for ResilientClient<C> {
    async fn search(&self, query: &str) -> Result<Vec<Card>> {
        self.search_with_cancel(query, &Cancellation::never()).await
    }

    async fn get_by_id(&self, id: &CardId) -> Result<Option<Card>> {
        self.get_by_id_with_cancel(id, &Cancellation::never()).await
    }
}
