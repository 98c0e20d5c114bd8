//! Undo/redo history over deck edits.
//!
//! `DeckState` is a pure state machine: `reduce` takes the current state and
//! one `DeckOperation` and returns the next state. Nothing is mutated in
//! place, so a reader holding the previous state never observes a
//! half-applied edit.
//!
//! ## Transitions
//!
//! - Edit (`ChangeTitle`, `AddCard`, `RemoveCard`, `Clear`): push the
//!   current deck onto `past`, apply the edit, clear `future`.
//! - `Undo`: move the current deck onto `future`, restore the last of `past`.
//!   No-op when `past` is empty.
//! - `Redo`: the mirror image. No-op when `future` is empty.
//!
//! Both stacks are capped at `HistoryConfig::capacity` snapshots; the oldest
//! snapshot is dropped first. Snapshots share structure (`im::Vector`), so
//! the cap bounds bookkeeping rather than deep copies.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::model::Deck;
use crate::cards::Card;

/// An operation the deck editor can dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckOperation {
    ChangeTitle(String),
    /// Append one copy.
    AddCard(Card),
    /// Remove at most one equal copy.
    RemoveCard(Card),
    /// Remove every card (the title stays).
    Clear,
    Undo,
    Redo,
}

impl DeckOperation {
    /// Whether this operation edits the deck (and so clears redo history).
    #[must_use]
    pub fn is_edit(&self) -> bool {
        !matches!(self, Self::Undo | Self::Redo)
    }
}

/// History bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum snapshots kept on each of the undo and redo stacks.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// A deck plus its undo and redo stacks.
///
/// ## Example
///
/// ```
/// use rust_tcg::deck::{DeckOperation, DeckState};
///
/// let state = DeckState::default()
///     .reduce(DeckOperation::ChangeTitle("Sparks".into()))
///     .reduce(DeckOperation::Undo);
///
/// assert_eq!(state.deck().title, "Awesome Deck");
/// assert!(state.has_redo());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckState {
    /// Older decks, most recent last.
    past: Vector<Deck>,
    deck: Deck,
    /// Undone decks, most recent last.
    future: Vector<Deck>,
    capacity: usize,
}

impl Default for DeckState {
    fn default() -> Self {
        Self::new(Deck::initial(), &HistoryConfig::default())
    }
}

impl DeckState {
    /// Start from `deck` with empty history.
    #[must_use]
    pub fn new(deck: Deck, config: &HistoryConfig) -> Self {
        Self {
            past: Vector::new(),
            deck,
            future: Vector::new(),
            capacity: config.capacity,
        }
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Snapshots available to `Undo`, oldest first.
    #[must_use]
    pub fn past(&self) -> &Vector<Deck> {
        &self.past
    }

    /// Snapshots available to `Redo`, the next one last.
    #[must_use]
    pub fn future(&self) -> &Vector<Deck> {
        &self.future
    }

    #[must_use]
    pub fn has_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn has_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Apply one operation, returning the next state.
    #[must_use]
    pub fn reduce(&self, operation: DeckOperation) -> Self {
        match operation {
            DeckOperation::Undo => self.undo(),
            DeckOperation::Redo => self.redo(),
            DeckOperation::ChangeTitle(title) => self.edit(self.deck.with_title(title)),
            DeckOperation::AddCard(card) => self.edit(self.deck.with_card(card)),
            DeckOperation::RemoveCard(card) => self.edit(self.deck.without_card(&card)),
            DeckOperation::Clear => self.edit(self.deck.cleared()),
        }
    }

    /// Apply operations in order.
    #[must_use]
    pub fn reduce_all(&self, operations: impl IntoIterator<Item = DeckOperation>) -> Self {
        operations
            .into_iter()
            .fold(self.clone(), |state, op| state.reduce(op))
    }

    fn edit(&self, deck: Deck) -> Self {
        Self {
            past: self.pushed(&self.past, self.deck.clone()),
            deck,
            future: Vector::new(),
            capacity: self.capacity,
        }
    }

    fn undo(&self) -> Self {
        let mut past = self.past.clone();
        let Some(previous) = past.pop_back() else {
            return self.clone();
        };
        Self {
            future: self.pushed(&self.future, self.deck.clone()),
            past,
            deck: previous,
            capacity: self.capacity,
        }
    }

    fn redo(&self) -> Self {
        let mut future = self.future.clone();
        let Some(next) = future.pop_back() else {
            return self.clone();
        };
        Self {
            past: self.pushed(&self.past, self.deck.clone()),
            future,
            deck: next,
            capacity: self.capacity,
        }
    }

    /// `stack` with `deck` on top, trimmed to capacity from the bottom.
    fn pushed(&self, stack: &Vector<Deck>, deck: Deck) -> Vector<Deck> {
        let mut stack = stack.clone();
        stack.push_back(deck);
        while stack.len() > self.capacity {
            stack.pop_front();
        }
        stack
    }
}
