//! Retry with exponential backoff.
//!
//! The delay starts at `base_delay_ms` and is multiplied by `multiplier`
//! after every failed attempt. Retrying stops once the next delay would
//! push the total time spent sleeping past `max_total_delay_ms`; the last
//! failure is then returned to the caller. Only transient errors
//! (`CatalogError::is_transient`) are retried.
//!
//! The policy knows nothing about what it retries: search and by-id
//! lookups go through the same `run`.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cancel::Cancellation;
use super::error::{CatalogError, Result};

/// Retry schedule parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Delay before the first retry, in milliseconds. Zero disables retry.
    pub base_delay_ms: u64,

    /// Growth factor between consecutive delays. Values below 1.0 are
    /// treated as 1.0 so the schedule never shrinks.
    pub multiplier: f64,

    /// Budget for the sum of all delays, in milliseconds.
    pub max_total_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 250,
            multiplier: 2.0,
            max_total_delay_ms: 5_000,
        }
    }
}

impl RetryConfig {
    /// A schedule that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_total_delay_ms: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_max_total_delay(mut self, delay: Duration) -> Self {
        self.max_total_delay_ms = delay.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    #[must_use]
    pub fn max_total_delay(&self) -> Duration {
        Duration::from_millis(self.max_total_delay_ms)
    }
}

/// Iterator over the delays of a retry schedule.
#[derive(Clone, Debug)]
pub struct Backoff {
    next: Duration,
    multiplier: f64,
    remaining: Duration,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        // A zero delay would never exhaust the budget.
        if self.next.is_zero() || self.next > self.remaining {
            return None;
        }
        let delay = self.next;
        self.remaining -= delay;
        self.next = scale(delay, self.multiplier);
        Some(delay)
    }
}

/// Multiply a duration, saturating instead of overflowing.
pub(crate) fn scale(duration: Duration, factor: f64) -> Duration {
    let nanos = (duration.as_nanos() as f64 * factor).round();
    if nanos < u64::MAX as f64 {
        Duration::from_nanos(nanos as u64)
    } else {
        Duration::MAX
    }
}

/// Retry policy shared by every lookup.
#[derive(Clone, Debug, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// The delays this policy sleeps between attempts, in order.
    #[must_use]
    pub fn delays(&self) -> Backoff {
        Backoff {
            next: self.config.base_delay(),
            multiplier: self.config.multiplier.max(1.0),
            remaining: self.config.max_total_delay(),
        }
    }

    /// Run `op` until it succeeds, fails permanently, or the delay budget
    /// is spent.
    ///
    /// `cancel` is checked before every attempt and raced against both the
    /// attempt and the backoff sleep; a fired signal yields
    /// `CatalogError::Cancelled`.
    pub async fn run<T, F, Fut>(&self, cancel: &Cancellation, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut delays = self.delays();
        let mut attempt: u32 = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(CatalogError::Cancelled);
            }

            let outcome = tokio::select! {
                outcome = op() => outcome,
                _ = cancel.cancelled() => return Err(CatalogError::Cancelled),
            };

            let error = match outcome {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "lookup succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(error) if !error.is_transient() => return Err(error),
                Err(error) => error,
            };

            let Some(delay) = delays.next() else {
                warn!(attempts = attempt, %error, "retry budget exhausted");
                return Err(error);
            };

            debug!(attempt, ?delay, %error, "lookup failed, backing off");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return Err(CatalogError::Cancelled),
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::api::cancel::cancellation;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_default_schedule() {
        let delays: Vec<_> = RetryPolicy::default().delays().collect();
        // 250 + 500 + 1000 + 2000 = 3750; the next 4000 would exceed 5000.
        assert_eq!(delays, vec![ms(250), ms(500), ms(1000), ms(2000)]);
    }

    #[test]
    fn test_custom_multiplier() {
        let config = RetryConfig::default()
            .with_base_delay(ms(100))
            .with_multiplier(3.0)
            .with_max_total_delay(ms(1_500));
        let delays: Vec<_> = RetryPolicy::new(config).delays().collect();
        assert_eq!(delays, vec![ms(100), ms(300), ms(900)]);
    }

    #[test]
    fn test_shrinking_multiplier_is_clamped() {
        let config = RetryConfig::default()
            .with_multiplier(0.5)
            .with_max_total_delay(ms(1_000));
        let delays: Vec<_> = RetryPolicy::new(config).delays().collect();
        assert_eq!(delays, vec![ms(250); 4]);
    }

    #[test]
    fn test_none_never_retries() {
        assert_eq!(RetryPolicy::new(RetryConfig::none()).delays().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_with_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<()> = policy
            .run(&Cancellation::never(), || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(CatalogError::Network(format!("failure {n}"))) }
            })
            .await;

        // One initial attempt plus four retries.
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(result, Err(CatalogError::Network("failure 5".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = RetryPolicy::default()
            .run(&Cancellation::never(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(CatalogError::Decode("not a card".into())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let (handle, signal) = cancellation();
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let run = policy.run(&signal, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(CatalogError::Network("down".into())) }
        });
        let cancel = async {
            tokio::time::sleep(ms(100)).await;
            handle.cancel();
        };
        let (result, ()) = tokio::join!(run, cancel);

        assert_eq!(result, Err(CatalogError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_makes_no_attempt() {
        let (handle, signal) = cancellation();
        handle.cancel();
        let calls = AtomicU32::new(0);

        let result: Result<()> = RetryPolicy::default()
            .run(&signal, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert_eq!(result, Err(CatalogError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
