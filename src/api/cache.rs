//! Read-through card cache.
//!
//! Maps `CardId` to the last `Card` the catalog returned for it. Bounded by
//! entry count (least-recently-used eviction) and optionally by age
//! (entries older than the TTL are treated as absent and dropped on access).
//!
//! The cache is never a source of truth: every network response overwrites
//! whatever was stored, and nothing is written back.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::cards::{Card, CardId};

/// Cache bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries. `None` for unbounded.
    pub capacity: Option<usize>,

    /// Maximum entry age in milliseconds. `None` for no expiry.
    pub ttl_ms: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: Some(1_024),
            ttl_ms: None,
        }
    }
}

impl CacheConfig {
    /// No count or age bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            capacity: None,
            ttl_ms: None,
        }
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = Some(ttl.as_millis() as u64);
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_ms.map(Duration::from_millis)
    }
}

/// A cached card and when it was stored.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub card: Card,
    pub inserted_at: Instant,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: FxHashMap<CardId, CacheEntry>,
    /// Use tick -> key, oldest first.
    recency: BTreeMap<u64, CardId>,
    tick: u64,
}

impl Inner {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn remove(&mut self, id: &CardId) -> Option<CacheEntry> {
        let entry = self.entries.remove(id)?;
        self.recency.remove(&entry.last_used);
        Some(entry)
    }
}

/// Thread-safe card cache.
///
/// ## Example
///
/// ```
/// use rust_tcg::api::{CacheConfig, CardCache};
/// use rust_tcg::cards::{CardId, TrainerCard, TrainerCategory};
///
/// let cache = CardCache::new(CacheConfig::default().with_capacity(2));
/// cache.put(TrainerCard::new("sv1-188", "Potion", TrainerCategory::Item).into());
///
/// assert!(cache.get(&CardId::new("sv1-188")).is_some());
/// ```
#[derive(Debug)]
pub struct CardCache {
    config: CacheConfig,
    inner: Mutex<Inner>,
}

impl Default for CardCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl CardCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        self.config
            .ttl()
            .is_some_and(|ttl| now.duration_since(entry.inserted_at) >= ttl)
    }

    /// Look up a card, marking it as recently used.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<Card> {
        let mut inner = self.lock();
        let now = Instant::now();

        let expired = self.is_expired(inner.entries.get(id)?, now);
        if expired {
            inner.remove(id);
            debug!(%id, "cache entry expired");
            return None;
        }

        let tick = inner.next_tick();
        let entry = inner.entries.get_mut(id)?;
        let previous = std::mem::replace(&mut entry.last_used, tick);
        let card = entry.card.clone();
        inner.recency.remove(&previous);
        inner.recency.insert(tick, id.clone());
        Some(card)
    }

    /// Store a card, replacing any entry with the same identifier.
    pub fn put(&self, card: Card) {
        let mut inner = self.lock();
        let id = card.id().clone();
        inner.remove(&id);

        let tick = inner.next_tick();
        inner.recency.insert(tick, id.clone());
        inner.entries.insert(
            id,
            CacheEntry {
                card,
                inserted_at: Instant::now(),
                last_used: tick,
            },
        );

        if let Some(capacity) = self.config.capacity {
            while inner.entries.len() > capacity {
                let Some((_, oldest)) = inner.recency.pop_first() else {
                    break;
                };
                inner.entries.remove(&oldest);
                debug!(id = %oldest, "evicted least recently used card");
            }
        }
    }

    /// Store every card in `cards`.
    pub fn put_all(&self, cards: impl IntoIterator<Item = Card>) {
        for card in cards {
            self.put(card);
        }
    }

    /// Whether a live (unexpired) entry exists. Does not affect recency.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        let inner = self.lock();
        let now = Instant::now();
        inner
            .entries
            .get(id)
            .is_some_and(|entry| !self.is_expired(entry, now))
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.lock();
        let now = Instant::now();
        let expired: Vec<CardId> = inner
            .entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry, now))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            inner.remove(id);
        }
        expired.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.recency.clear();
    }
}
