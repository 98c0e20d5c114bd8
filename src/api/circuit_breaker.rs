//! Circuit breaker for the card catalog.
//!
//! ## States
//!
//! - Closed: calls pass through; consecutive failures are counted
//! - Open: calls fail fast with `CatalogError::CircuitOpen` until the
//!   reset timeout elapses
//! - HalfOpen: exactly one trial call is in flight; everyone else fails fast
//!
//! ## Transitions
//!
//! ```text
//! Closed   -> Open:     failure_threshold consecutive failures
//! Open     -> HalfOpen: first call after the reset timeout (takes the trial slot)
//! HalfOpen -> Closed:   trial succeeds (count and timeout reset)
//! HalfOpen -> Open:     trial fails (timeout *= backoff_factor, capped)
//! ```
//!
//! All transitions happen under one mutex that is never held across an
//! `.await`, so concurrent callers observe each transition atomically.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::error::{CatalogError, Result};
use super::retry::scale;

/// Circuit breaker parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the breaker.
    pub failure_threshold: u32,

    /// Initial time the breaker stays open, in milliseconds.
    pub reset_timeout_ms: u64,

    /// Multiplier applied to the reset timeout after a failed trial.
    pub backoff_factor: f64,

    /// Ceiling for the reset timeout, in milliseconds.
    pub max_reset_timeout_ms: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 4,
            reset_timeout_ms: 2_000,
            backoff_factor: 1.2,
            max_reset_timeout_ms: 60_000,
        }
    }
}

impl CircuitBreakerConfig {
    #[must_use]
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout_ms = timeout.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    #[must_use]
    pub fn with_max_reset_timeout(mut self, timeout: Duration) -> Self {
        self.max_reset_timeout_ms = timeout.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn reset_timeout(&self) -> Duration {
        Duration::from_millis(self.reset_timeout_ms)
    }

    #[must_use]
    pub fn max_reset_timeout(&self) -> Duration {
        Duration::from_millis(self.max_reset_timeout_ms)
    }
}

/// Observable breaker state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Closed,
    Open { until: Instant },
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    failures: u32,
    reset_timeout: Duration,
}

/// How a call was admitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Permit {
    Normal,
    Trial,
}

/// Circuit breaker shared by every call through a `ResilientClient`.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl CircuitBreaker {
    #[must_use]
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let reset_timeout = config.reset_timeout();
        Self {
            config,
            inner: Mutex::new(Inner {
                phase: Phase::Closed,
                failures: 0,
                reset_timeout,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state. An Open breaker whose timeout has elapsed still
    /// reports Open until a call takes the trial slot.
    #[must_use]
    pub fn state(&self) -> CircuitState {
        match self.lock().phase {
            Phase::Closed => CircuitState::Closed,
            Phase::Open { .. } => CircuitState::Open,
            Phase::HalfOpen => CircuitState::HalfOpen,
        }
    }

    /// Consecutive failures counted while Closed.
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.lock().failures
    }

    /// Time the breaker stays open after its next trip.
    #[must_use]
    pub fn reset_timeout(&self) -> Duration {
        self.lock().reset_timeout
    }

    /// Run `op` under the breaker.
    ///
    /// Fails with `CatalogError::CircuitOpen` without calling `op` while
    /// the breaker is open or another caller holds the half-open trial.
    /// `CatalogError::Cancelled` outcomes are not counted as failures.
    pub async fn call<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let permit = self.admit()?;
        let mut guard = TrialGuard {
            breaker: self,
            armed: permit == Permit::Trial,
        };

        let outcome = op().await;
        guard.armed = false;

        match &outcome {
            Ok(_) => self.on_success(permit),
            Err(CatalogError::Cancelled) => self.on_cancelled(permit),
            Err(error) => self.on_failure(permit, error),
        }
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit(&self) -> Result<Permit> {
        let mut inner = self.lock();
        let now = Instant::now();
        let phase = inner.phase;
        match phase {
            Phase::Closed => Ok(Permit::Normal),
            Phase::Open { until } if now < until => {
                let retry_after = until - now;
                debug!(?retry_after, "circuit open, failing fast");
                Err(CatalogError::CircuitOpen { retry_after })
            }
            Phase::Open { .. } => {
                debug!("reset timeout elapsed, admitting trial call");
                inner.phase = Phase::HalfOpen;
                Ok(Permit::Trial)
            }
            Phase::HalfOpen => Err(CatalogError::CircuitOpen {
                retry_after: Duration::ZERO,
            }),
        }
    }

    fn on_success(&self, permit: Permit) {
        let mut inner = self.lock();
        match permit {
            Permit::Trial => {
                info!("trial call succeeded, closing circuit");
                inner.phase = Phase::Closed;
                inner.failures = 0;
                inner.reset_timeout = self.config.reset_timeout();
            }
            Permit::Normal => {
                if matches!(inner.phase, Phase::Closed) {
                    inner.failures = 0;
                }
            }
        }
    }

    fn on_failure(&self, permit: Permit, error: &CatalogError) {
        let mut inner = self.lock();
        let now = Instant::now();
        match permit {
            Permit::Trial => {
                let grown = scale(inner.reset_timeout, self.config.backoff_factor.max(1.0));
                inner.reset_timeout = grown.min(self.config.max_reset_timeout());
                inner.phase = Phase::Open {
                    until: now + inner.reset_timeout,
                };
                warn!(reset_timeout = ?inner.reset_timeout, %error, "trial call failed, reopening circuit");
            }
            Permit::Normal => {
                // Failures of calls admitted before another caller tripped
                // the breaker do not extend the open period.
                if !matches!(inner.phase, Phase::Closed) {
                    return;
                }
                inner.failures = inner.failures.saturating_add(1);
                if inner.failures >= self.config.failure_threshold {
                    inner.phase = Phase::Open {
                        until: now + inner.reset_timeout,
                    };
                    warn!(
                        failures = inner.failures,
                        reset_timeout = ?inner.reset_timeout,
                        %error,
                        "failure threshold reached, opening circuit"
                    );
                }
            }
        }
    }

    fn on_cancelled(&self, permit: Permit) {
        if permit == Permit::Trial {
            self.release_trial();
        }
    }

    /// Give the trial slot back without a verdict: the next caller may
    /// try immediately.
    fn release_trial(&self) {
        let mut inner = self.lock();
        if matches!(inner.phase, Phase::HalfOpen) {
            inner.phase = Phase::Open {
                until: Instant::now(),
            };
        }
    }
}

/// Releases the half-open trial slot if the trial future is dropped
/// before completing.
struct TrialGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.release_trial();
        }
    }
}
