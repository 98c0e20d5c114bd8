//! Decks: the value type, validation, edit history and file format.
//!
//! ## Key Types
//!
//! - `Deck`: Title plus a multiset of cards (persistent vector)
//! - `DeckValidator`: Accumulates every rule violation as `Problems`
//! - `DeckState`: Deck with bounded undo/redo stacks, driven by `DeckOperation`
//! - `DeckFile`: Title plus identifiers, the on-disk form

pub mod file;
pub mod history;
pub mod model;
pub mod validation;

pub use file::{decode, encode, DeckFile, FileFormatError, UnresolvedLine};
pub use history::{DeckOperation, DeckState, HistoryConfig};
pub use model::{Deck, INITIAL_TITLE};
pub use validation::{DeckError, DeckRules, DeckValidator, Problems};
