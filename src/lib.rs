//! # rust-tcg
//!
//! Client core for a trading card game deck builder.
//!
//! ## Design Principles
//!
//! 1. **Errors Are Values**: Deck violations are accumulated into a
//!    non-empty list and returned, never raised one at a time. Network,
//!    circuit and file errors are `Result`s the UI can display.
//!
//! 2. **Immutable Decks**: Every edit produces a new `Deck`. Undo/redo is a
//!    pure reducer over snapshots; `im` vectors make snapshots cheap.
//!
//! 3. **Fail Fast When Down**: Catalog calls go through a circuit breaker
//!    wrapping exponential-backoff retry, with a card cache in front.
//!
//! ## Modules
//!
//! - `cards`: Card identifiers, categories, typings, in-memory registry
//! - `deck`: Deck value type, validation, undo/redo history, file format
//! - `api`: Catalog client trait, retry, circuit breaker, cache, repository
//! - `session`: Deck editor and debounced search sessions
//! - `core`: Configuration and `NonEmpty`
//!
//! ## Example
//!
//! ```
//! use rust_tcg::{DeckOperation, DeckState};
//! use rust_tcg::cards::{PokemonCard, PokemonStage, PokemonType};
//!
//! let bulbasaur = PokemonCard::new("sv3pt5-1", "Bulbasaur", PokemonStage::Basic, PokemonType::Grass);
//!
//! let state = DeckState::default().reduce(DeckOperation::AddCard(bulbasaur.into()));
//! let problems = state.deck().validate().unwrap_err();
//!
//! // 1 card is far from 60, but the deck does have a starter.
//! assert_eq!(problems.len(), 1);
//! assert_eq!(problems.first().to_string(), "Deck too small: 1, should be 60");
//! ```

pub mod api;
pub mod cards;
pub mod core;
pub mod deck;
pub mod session;

// Re-export commonly used types
pub use crate::core::{ClientConfig, ConfigError, NonEmpty};

pub use crate::cards::{Card, CardId, CardRegistry, Category, PokemonCard, PokemonStage};

pub use crate::deck::{
    Deck, DeckError, DeckOperation, DeckRules, DeckState, DeckValidator, FileFormatError, Problems,
};

pub use crate::api::{
    CardCache, CardCatalogClient, CardRepository, CatalogError, CircuitBreaker, CircuitState,
    ResilientClient, RetryPolicy,
};

pub use crate::session::{DeckSession, SearchSession, SearchStatus};
