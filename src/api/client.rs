//! The card lookup capability.
//!
//! `CardCatalogClient` is the leaf of the lookup stack: one attempt per
//! call, no retry, no caching. `ResilientClient` and `CardRepository`
//! layer policy on top of any implementation.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::Result;
use crate::cards::{Card, CardId};

/// Remote (or in-memory) card catalog.
///
/// ## Implementation Notes
///
/// - `search`: free text over card names; an empty list means no matches
/// - `get_by_id`: `Ok(None)` when the catalog has no such card
/// - Transport failures should be `CatalogError::Network` so they are retried
#[async_trait]
pub trait CardCatalogClient: Send + Sync {
    /// Find cards whose name matches `query`.
    async fn search(&self, query: &str) -> Result<Vec<Card>>;

    /// Look up a single card by identifier.
    async fn get_by_id(&self, id: &CardId) -> Result<Option<Card>>;
}

#[async_trait]
impl<C: CardCatalogClient + ?Sized> CardCatalogClient for Arc<C> {
    async fn search(&self, query: &str) -> Result<Vec<Card>> {
        (**self).search(query).await
    }

    async fn get_by_id(&self, id: &CardId) -> Result<Option<Card>> {
        (**self).get_by_id(id).await
    }
}
