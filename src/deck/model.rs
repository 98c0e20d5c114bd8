//! The deck value type.
//!
//! A `Deck` is a title plus a multiset of cards. Card order carries no
//! meaning; duplicates (same identifier) are how multiple copies are
//! represented.
//!
//! Decks are never mutated in place: every edit returns a new `Deck`.
//! Cards are held in an `im::Vector`, so the copy shares structure with
//! the original and keeping many snapshots for undo is cheap.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Title given to a fresh deck.
pub const INITIAL_TITLE: &str = "Awesome Deck";

/// A deck under construction.
///
/// ## Example
///
/// ```
/// use rust_tcg::cards::{PokemonCard, PokemonStage, PokemonType};
/// use rust_tcg::deck::Deck;
///
/// let pikachu = PokemonCard::new("sv1-1", "Pikachu", PokemonStage::Basic, PokemonType::Lightning);
///
/// let empty = Deck::initial();
/// let one = empty.with_card(pikachu.into());
///
/// assert_eq!(empty.len(), 0);
/// assert_eq!(one.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Display title.
    pub title: String,

    /// Cards in the deck, in insertion order.
    pub cards: Vector<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::initial()
    }
}

impl Deck {
    /// Create a deck from a title and cards.
    #[must_use]
    pub fn new(title: impl Into<String>, cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            title: title.into(),
            cards: cards.into_iter().collect(),
        }
    }

    /// The empty deck shown when the application starts.
    #[must_use]
    pub fn initial() -> Self {
        Self::new(INITIAL_TITLE, [])
    }

    /// Number of cards (copies included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Number of cards with the given name, across all identifiers.
    #[must_use]
    pub fn count_named(&self, name: &str) -> usize {
        self.cards.iter().filter(|c| c.name() == name).count()
    }

    /// Cards in display order (see `Card`'s `Ord`).
    #[must_use]
    pub fn sorted_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        cards.sort();
        cards
    }

    // === Edits (each returns a new deck) ===

    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cards: self.cards.clone(),
        }
    }

    /// Add one copy of `card`.
    #[must_use]
    pub fn with_card(&self, card: Card) -> Self {
        let mut cards = self.cards.clone();
        cards.push_back(card);
        Self {
            title: self.title.clone(),
            cards,
        }
    }

    /// Remove one copy of `card`, if present. Other copies stay.
    #[must_use]
    pub fn without_card(&self, card: &Card) -> Self {
        let mut cards = self.cards.clone();
        if let Some(index) = cards.index_of(card) {
            cards.remove(index);
        }
        Self {
            title: self.title.clone(),
            cards,
        }
    }

    /// Remove every card, keeping the title.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            title: self.title.clone(),
            cards: Vector::new(),
        }
    }
}
