//! Remote card lookups and the resilience layers around them.
//!
//! ## Layers
//!
//! - `CardCatalogClient`: one attempt per call (the leaf)
//! - `RetryPolicy`: exponential backoff over transient failures
//! - `CircuitBreaker`: fail fast while the catalog is down
//! - `ResilientClient`: breaker(retry(client))
//! - `CardCache`: LRU/TTL cache keyed by card identifier
//! - `CardRepository`: cache in front of the resilient client
//!
//! ```text
//! CardRepository -> CardCache (hit) ─────────────────────────> Card
//!                └> ResilientClient -> CircuitBreaker -> RetryPolicy -> CardCatalogClient
//! ```

pub mod cache;
pub mod cancel;
pub mod circuit_breaker;
pub mod client;
pub mod error;
pub mod repository;
pub mod resilient;
pub mod retry;

pub use cache::{CacheConfig, CacheEntry, CardCache};
pub use cancel::{cancellation, CancelHandle, Cancellation};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use client::CardCatalogClient;
pub use error::{CatalogError, Result as CatalogResult};
pub use repository::CardRepository;
pub use resilient::ResilientClient;
pub use retry::{Backoff, RetryConfig, RetryPolicy};
