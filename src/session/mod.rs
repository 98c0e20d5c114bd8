//! Application-facing sessions.
//!
//! - `DeckSession`: apply/undo/redo/reset, problems, load and save
//! - `SearchSession`: debounced, last-query-wins card search

pub mod deck;
pub mod search;

pub use deck::DeckSession;
pub use search::{SearchSession, SearchStatus, NO_RUNTIME};
