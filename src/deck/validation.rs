//! Deck validation.
//!
//! Every rule is evaluated on every call; violations are accumulated into
//! one `Problems` list instead of stopping at the first. Validation is a
//! pure function of the deck: no side effects, safe to call as often as
//! the deck is displayed.
//!
//! ## Rules
//!
//! | Rule | Violation |
//! |---|---|
//! | fewer than `min_size` cards | `DeckTooSmall` |
//! | more than `max_size` cards | `DeckTooLarge` |
//! | blank title | `EmptyName` |
//! | no Basic Pokemon | `NoStarter` |
//! | more than `copy_limit` cards sharing a name (Basic Energy exempt) | `TooManyCopies`, one per name |
//! | an evolution whose previous stage is missing | `CannotEvolve`, one per distinct card |

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::model::Deck;
use crate::cards::{Card, PokemonCard, PokemonStage};
use crate::core::NonEmpty;

/// All violations found in a deck. Never empty.
pub type Problems = NonEmpty<DeckError>;

/// Deck construction limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckRules {
    /// Smallest legal deck (inclusive).
    pub min_size: usize,

    /// Largest legal deck (inclusive).
    pub max_size: usize,

    /// Maximum copies of any card name other than Basic Energy.
    pub copy_limit: usize,
}

impl Default for DeckRules {
    fn default() -> Self {
        Self {
            min_size: 60,
            max_size: 60,
            copy_limit: 4,
        }
    }
}

impl DeckRules {
    #[must_use]
    pub fn with_size(mut self, min: usize, max: usize) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    #[must_use]
    pub fn with_copy_limit(mut self, limit: usize) -> Self {
        self.copy_limit = limit;
        self
    }
}

/// A single rule violation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("Deck too large: {size}, should be {expected}")]
    DeckTooLarge { size: usize, expected: usize },

    #[error("Deck too small: {size}, should be {expected}")]
    DeckTooSmall { size: usize, expected: usize },

    #[error("Title cannot be blank")]
    EmptyName,

    #[error("Deck must have a starter")]
    NoStarter,

    /// Every copy of the offending name, in deck order.
    #[error("Too many copies of {}, expected: {limit}, actual: {}", .cards.first().name(), .cards.len())]
    TooManyCopies { cards: NonEmpty<Card>, limit: usize },

    #[error("No evolution found for {}, add a {}", .card.name, .card.evolves_from.as_deref().unwrap_or_default())]
    CannotEvolve { card: PokemonCard },
}

/// Checks decks against a set of `DeckRules`.
#[derive(Clone, Debug, Default)]
pub struct DeckValidator {
    rules: DeckRules,
}

impl DeckValidator {
    #[must_use]
    pub fn new(rules: DeckRules) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &DeckRules {
        &self.rules
    }

    /// Return the deck unchanged if it is legal, otherwise every violation.
    pub fn validate<'d>(&self, deck: &'d Deck) -> Result<&'d Deck, Problems> {
        let mut errors = Vec::new();
        errors.extend(self.check_size(deck));
        errors.extend(check_title(deck));
        errors.extend(check_starter(deck));
        errors.extend(self.check_copies(deck));
        errors.extend(check_evolutions(deck));

        match NonEmpty::from_vec(errors) {
            None => Ok(deck),
            Some(problems) => Err(problems),
        }
    }

    /// Violations only; `None` for a legal deck.
    #[must_use]
    pub fn problems(&self, deck: &Deck) -> Option<Problems> {
        self.validate(deck).err()
    }

    fn check_size(&self, deck: &Deck) -> Option<DeckError> {
        let size = deck.len();
        if size < self.rules.min_size {
            Some(DeckError::DeckTooSmall {
                size,
                expected: self.rules.min_size,
            })
        } else if size > self.rules.max_size {
            Some(DeckError::DeckTooLarge {
                size,
                expected: self.rules.max_size,
            })
        } else {
            None
        }
    }

    fn check_copies(&self, deck: &Deck) -> Vec<DeckError> {
        let mut by_name: FxHashMap<&str, Vec<Card>> = FxHashMap::default();
        for card in deck.iter().filter(|c| !c.is_basic_energy()) {
            by_name.entry(card.name()).or_default().push(card.clone());
        }

        let mut offenders: Vec<(&str, Vec<Card>)> = by_name
            .into_iter()
            .filter(|(_, copies)| copies.len() > self.rules.copy_limit)
            .collect();
        offenders.sort_by(|a, b| a.0.cmp(b.0));

        offenders
            .into_iter()
            .filter_map(|(_, copies)| NonEmpty::from_vec(copies))
            .map(|cards| DeckError::TooManyCopies {
                cards,
                limit: self.rules.copy_limit,
            })
            .collect()
    }
}

fn check_title(deck: &Deck) -> Option<DeckError> {
    deck.title.trim().is_empty().then_some(DeckError::EmptyName)
}

fn check_starter(deck: &Deck) -> Option<DeckError> {
    (!deck.iter().any(Card::is_basic_pokemon)).then_some(DeckError::NoStarter)
}

fn check_evolutions(deck: &Deck) -> Vec<DeckError> {
    let pokemon: Vec<&PokemonCard> = deck.iter().filter_map(Card::as_pokemon).collect();
    let mut errors: Vec<DeckError> = Vec::new();

    // Stage1 evolutions first, then Stage2.
    for stage in [PokemonStage::Stage1, PokemonStage::Stage2] {
        let Some(required) = stage.previous() else {
            continue;
        };
        for evolution in pokemon.iter().filter(|p| p.stage == stage) {
            let Some(from) = evolution.evolves_from.as_deref() else {
                continue;
            };
            let reachable = pokemon.iter().any(|p| p.stage == required && p.name == from);
            let error = DeckError::CannotEvolve {
                card: (*evolution).clone(),
            };
            if !reachable && !errors.contains(&error) {
                errors.push(error);
            }
        }
    }
    errors
}

impl Deck {
    /// Validate against the default rules.
    pub fn validate(&self) -> Result<&Deck, Problems> {
        DeckValidator::default().validate(self)
    }
}
