//! In-memory card catalog.
//!
//! The `CardRegistry` stores card definitions keyed by `CardId` and
//! answers the same lookups as the remote catalog. It backs offline use,
//! demos and tests (wrap it in a counting or failing client to exercise
//! the resilience layers).

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use super::definition::{Card, CardId, PokemonCard, PokemonStage};
use super::typing::PokemonType;
use crate::api::{CardCatalogClient, CatalogResult};

/// Default maximum number of search results.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use rust_tcg::cards::{CardRegistry, CardId};
///
/// let registry = CardRegistry::with_sample_cards();
///
/// let found = registry.get(&CardId::new("sv3pt5-4")).unwrap();
/// assert_eq!(found.name(), "Charmander");
/// assert_eq!(registry.find_by_name("saur").count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Card>,
    page_size: usize,
}

impl Default for CardRegistry {
    fn default() -> Self {
        Self {
            cards: FxHashMap::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the four starter Pokemon of the 151 set.
    #[must_use]
    pub fn with_sample_cards() -> Self {
        let mut registry = Self::new();
        let samples = [
            ("sv3pt5-1", "Bulbasaur", PokemonType::Grass),
            ("sv3pt5-4", "Charmander", PokemonType::Fire),
            ("sv3pt5-7", "Squirtle", PokemonType::Water),
            ("sv3pt5-10", "Caterpie", PokemonType::Grass),
        ];
        for (id, name, typing) in samples {
            registry.register(PokemonCard::new(id, name, PokemonStage::Basic, typing));
        }
        registry
    }

    /// Limit the number of results returned by a search.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Register a card.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: impl Into<Card>) {
        let card = card.into();
        if self.cards.contains_key(card.id()) {
            panic!("Card with ID {} already registered", card.id());
        }
        self.cards.insert(card.id().clone(), card);
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Cards whose name contains `query`, ignoring case.
    pub fn find_by_name<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Card> + 'a {
        let needle = query.trim().to_lowercase();
        self.cards
            .values()
            .filter(move |c| c.name().to_lowercase().contains(&needle))
    }

    /// Search results as the remote catalog returns them: ordered by name,
    /// capped at the page size. A blank query matches nothing.
    #[must_use]
    pub fn search_page(&self, query: &str) -> Vec<Card> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let mut found: Vec<Card> = self.find_by_name(query).cloned().collect();
        found.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.cmp(b)));
        found.truncate(self.page_size);
        found
    }
}

#[async_trait]
impl CardCatalogClient for CardRegistry {
    async fn search(&self, query: &str) -> CatalogResult<Vec<Card>> {
        Ok(self.search_page(query))
    }

    async fn get_by_id(&self, id: &CardId) -> CatalogResult<Option<Card>> {
        Ok(self.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{TrainerCard, TrainerCategory};

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry.register(TrainerCard::new("sv1-188", "Potion", TrainerCategory::Item));

        let found = registry.get(&CardId::new("sv1-188"));
        assert!(found.is_some());
        assert_eq!(found.unwrap().name(), "Potion");

        assert!(registry.get(&CardId::new("sv1-999")).is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = CardRegistry::new();
        registry.register(TrainerCard::new("sv1-188", "Potion", TrainerCategory::Item));
        registry.register(TrainerCard::new("sv1-188", "Other", TrainerCategory::Item));
    }

    #[test]
    fn test_sample_cards() {
        let registry = CardRegistry::with_sample_cards();
        assert_eq!(registry.len(), 4);
        assert!(registry.iter().all(Card::is_basic_pokemon));
        assert!(registry.contains(&CardId::new("sv3pt5-10")));
    }

    #[test]
    fn test_search_is_case_insensitive_and_sorted() {
        let registry = CardRegistry::with_sample_cards();

        let names: Vec<_> = registry
            .search_page("R")
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["Bulbasaur", "Caterpie", "Charmander", "Squirtle"]);
    }

    #[test]
    fn test_blank_search_is_empty() {
        let registry = CardRegistry::with_sample_cards();
        assert!(registry.search_page("").is_empty());
        assert!(registry.search_page("   ").is_empty());
    }

    #[test]
    fn test_page_size() {
        let registry = CardRegistry::with_sample_cards().with_page_size(2);
        assert_eq!(registry.search_page("a").len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_client_impl() {
        let registry = CardRegistry::with_sample_cards();

        let results = registry.search("squirt").await.unwrap();
        assert_eq!(results.len(), 1);

        let card = registry.get_by_id(&CardId::new("sv3pt5-7")).await.unwrap();
        assert_eq!(card.map(|c| c.name().to_string()), Some("Squirtle".to_string()));

        assert_eq!(registry.get_by_id(&CardId::new("nope-1")).await.unwrap(), None);
    }
}
