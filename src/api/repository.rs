//! Card repository: cache in front of the resilient client.
//!
//! - `search` always goes to the network (blank queries excepted) and
//!   writes every returned card into the cache.
//! - `get_by_id` answers from the cache when it can; on a miss it asks the
//!   network and caches a found card.
//!
//! The cache is only ever populated here, never invalidated. Search
//! results go through the same LRU as lookups, so a search may evict
//! older entries; a page larger than the capacity keeps only its tail.

use std::sync::Arc;

use tracing::debug;

use super::cache::CardCache;
use super::cancel::Cancellation;
use super::client::CardCatalogClient;
use super::error::Result;
use super::resilient::ResilientClient;
use crate::cards::{Card, CardId};
use crate::core::ClientConfig;

/// "Get or fetch" access to the card catalog.
///
/// ## Example
///
/// ```
/// use rust_tcg::api::CardRepository;
/// use rust_tcg::cards::{CardId, CardRegistry};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let repo = CardRepository::from_config(CardRegistry::with_sample_cards(), &Default::default());
///
/// let found = repo.search("char").await.unwrap();
/// assert_eq!(found.len(), 1);
/// assert!(repo.cache().contains(&CardId::new("sv3pt5-4")));
/// # });
/// ```
#[derive(Debug)]
pub struct CardRepository<C> {
    client: ResilientClient<C>,
    cache: Arc<CardCache>,
}

impl<C: CardCatalogClient> CardRepository<C> {
    pub fn new(client: ResilientClient<C>, cache: Arc<CardCache>) -> Self {
        Self { client, cache }
    }

    /// Build the whole stack (cache, breaker, retry) around `inner`.
    pub fn from_config(inner: C, config: &ClientConfig) -> Self {
        let client = ResilientClient::with_config(
            inner,
            config.retry.clone(),
            config.circuit_breaker.clone(),
        );
        Self::new(client, Arc::new(CardCache::new(config.cache.clone())))
    }

    pub fn cache(&self) -> &Arc<CardCache> {
        &self.cache
    }

    pub fn client(&self) -> &ResilientClient<C> {
        &self.client
    }

    /// Search the catalog. A blank query returns no cards without a
    /// network call.
    pub async fn search(&self, query: &str) -> Result<Vec<Card>> {
        self.search_with_cancel(query, &Cancellation::never()).await
    }

    /// `search` that gives up once `cancel` fires.
    pub async fn search_with_cancel(&self, query: &str, cancel: &Cancellation) -> Result<Vec<Card>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let cards = self.client.search_with_cancel(query, cancel).await?;
        debug!(query, results = cards.len(), "search complete");
        self.cache.put_all(cards.iter().cloned());
        Ok(cards)
    }

    /// Look up a card, preferring the cache.
    pub async fn get_by_id(&self, id: &CardId) -> Result<Option<Card>> {
        if let Some(card) = self.cache.get(id) {
            debug!(%id, "cache hit");
            return Ok(Some(card));
        }
        debug!(%id, "cache miss");

        let found = self
            .client
            .get_by_id_with_cancel(id, &Cancellation::never())
            .await?;
        if let Some(card) = &found {
            self.cache.put(card.clone());
        }
        Ok(found)
    }
}
