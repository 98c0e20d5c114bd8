//! The deck editor session.
//!
//! Owns the current `DeckState` and applies every operation as one atomic
//! read-modify-write, so concurrent callers never see a half-applied edit.
//! Problems are derived from the current deck on demand and never stored.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::api::{CardCatalogClient, CardRepository};
use crate::cards::{Card, CardId};
use crate::core::{ClientConfig, NonEmpty};
use crate::deck::{
    decode, encode, Deck, DeckOperation, DeckState, DeckValidator, FileFormatError, HistoryConfig,
    Problems, UnresolvedLine,
};

/// Deck editing, validation and persistence against one card repository.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
///
/// use rust_tcg::api::CardRepository;
/// use rust_tcg::cards::{CardId, CardRegistry};
/// use rust_tcg::core::ClientConfig;
/// use rust_tcg::deck::DeckOperation;
/// use rust_tcg::session::DeckSession;
///
/// let config = ClientConfig::default();
/// let registry = CardRegistry::with_sample_cards();
/// let bulbasaur = registry.get(&CardId::new("sv3pt5-1")).unwrap().clone();
///
/// let repo = Arc::new(CardRepository::from_config(registry, &config));
/// let session = DeckSession::new(repo, &config);
///
/// session.apply(DeckOperation::AddCard(bulbasaur));
/// assert_eq!(session.current_deck().len(), 1);
///
/// session.undo();
/// assert!(session.current_deck().is_empty());
/// assert!(session.has_redo());
/// ```
#[derive(Debug)]
pub struct DeckSession<C> {
    repo: Arc<CardRepository<C>>,
    validator: DeckValidator,
    history: HistoryConfig,
    state: Mutex<DeckState>,
}

impl<C: CardCatalogClient> DeckSession<C> {
    /// Start with `Deck::initial()` and no history.
    pub fn new(repo: Arc<CardRepository<C>>, config: &ClientConfig) -> Self {
        Self {
            repo,
            validator: DeckValidator::new(config.deck_rules.clone()),
            history: config.history.clone(),
            state: Mutex::new(DeckState::new(Deck::initial(), &config.history)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeckState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn repository(&self) -> &Arc<CardRepository<C>> {
        &self.repo
    }

    pub fn validator(&self) -> &DeckValidator {
        &self.validator
    }

    // === State ===

    /// Apply one operation atomically, returning the resulting state.
    pub fn apply(&self, operation: DeckOperation) -> DeckState {
        let mut state = self.lock();
        *state = state.reduce(operation);
        state.clone()
    }

    pub fn undo(&self) -> DeckState {
        self.apply(DeckOperation::Undo)
    }

    pub fn redo(&self) -> DeckState {
        self.apply(DeckOperation::Redo)
    }

    /// Back to `Deck::initial()` with empty history.
    pub fn reset(&self) {
        *self.lock() = DeckState::new(Deck::initial(), &self.history);
    }

    /// Snapshot of the whole state.
    pub fn state(&self) -> DeckState {
        self.lock().clone()
    }

    pub fn current_deck(&self) -> Deck {
        self.lock().deck().clone()
    }

    pub fn has_undo(&self) -> bool {
        self.lock().has_undo()
    }

    pub fn has_redo(&self) -> bool {
        self.lock().has_redo()
    }

    /// Violations in the current deck, or `None` if it is legal.
    pub fn problems(&self) -> Option<Problems> {
        let deck = self.current_deck();
        self.validator.problems(&deck)
    }

    // === Persistence ===

    /// Serialize the current deck.
    pub fn save_deck(&self) -> Vec<u8> {
        encode(&self.current_deck())
    }

    /// Replace the session with the deck in `bytes`.
    ///
    /// Every identifier is looked up (distinct identifiers concurrently).
    /// If any line fails to resolve, the load is rejected with every failing
    /// line and the current state is left untouched. On success the loaded
    /// deck starts with empty history.
    pub async fn load_deck(&self, bytes: &[u8]) -> Result<Deck, FileFormatError> {
        let file = decode(bytes)?;

        // One lookup per distinct identifier; each entry points at its slot.
        let mut slot_of: FxHashMap<&CardId, usize> = FxHashMap::default();
        let mut distinct: Vec<&CardId> = Vec::new();
        let slots: Vec<usize> = file
            .ids()
            .map(|id| {
                *slot_of.entry(id).or_insert_with(|| {
                    distinct.push(id);
                    distinct.len() - 1
                })
            })
            .collect();

        let lookups = join_all(distinct.iter().map(|id| self.resolve(id))).await;

        let mut cards = Vec::with_capacity(file.entries.len());
        let mut unresolved = Vec::new();
        for ((line, id), slot) in file.entries.iter().zip(slots) {
            match &lookups[slot] {
                Ok(card) => cards.push(card.clone()),
                Err(reason) => unresolved.push(UnresolvedLine {
                    line: *line,
                    identifier: id.clone(),
                    reason: reason.clone(),
                }),
            }
        }

        if let Some(lines) = NonEmpty::from_vec(unresolved) {
            warn!(title = %file.title, failed = lines.len(), "deck load rejected");
            return Err(FileFormatError::Unresolved(lines));
        }

        let deck = Deck::new(file.title, cards);
        *self.lock() = DeckState::new(deck.clone(), &self.history);
        info!(title = %deck.title, cards = deck.len(), "deck loaded");
        Ok(deck)
    }

    async fn resolve(&self, id: &CardId) -> Result<Card, String> {
        match self.repo.get_by_id(id).await {
            Ok(Some(card)) => Ok(card),
            Ok(None) => Err("no card found".to_string()),
            Err(error) => Err(error.to_string()),
        }
    }

    /// `load_deck` from a file.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<Deck, FileFormatError> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        self.load_deck(&bytes).await
    }

    /// `save_deck` to a file, replacing it.
    pub async fn save_file(&self, path: impl AsRef<Path>) -> Result<(), FileFormatError> {
        let bytes = self.save_deck();
        tokio::fs::write(path.as_ref(), &bytes).await?;
        info!(path = %path.as_ref().display(), bytes = bytes.len(), "deck saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;
    use crate::deck::DeckError;

    fn session() -> DeckSession<CardRegistry> {
        let config = ClientConfig::default();
        let repo = CardRepository::from_config(CardRegistry::with_sample_cards(), &config);
        DeckSession::new(Arc::new(repo), &config)
    }

    fn card(id: &str) -> Card {
        CardRegistry::with_sample_cards()
            .get(&CardId::new(id))
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let session = session();
        assert_eq!(session.current_deck(), Deck::initial());
        assert!(!session.has_undo());
        assert!(!session.has_redo());
    }

    #[test]
    fn test_problems_follow_the_deck() {
        let session = session();
        let problems = session.problems().unwrap();
        assert!(problems.iter().any(|e| *e == DeckError::NoStarter));

        session.apply(DeckOperation::AddCard(card("sv3pt5-1")));
        let problems = session.problems().unwrap();
        assert!(!problems.iter().any(|e| *e == DeckError::NoStarter));
    }

    #[test]
    fn test_reset() {
        let session = session();
        session.apply(DeckOperation::ChangeTitle("Seeds".into()));
        session.apply(DeckOperation::AddCard(card("sv3pt5-1")));
        session.reset();

        assert_eq!(session.current_deck(), Deck::initial());
        assert!(!session.has_undo());
    }

    #[test]
    fn test_save_deck() {
        let session = session();
        session.apply(DeckOperation::ChangeTitle("Starters".into()));
        session.apply(DeckOperation::AddCard(card("sv3pt5-4")));
        session.apply(DeckOperation::AddCard(card("sv3pt5-7")));

        assert_eq!(session.save_deck(), b"Starters\nsv3pt5-4\nsv3pt5-7".to_vec());
    }

    #[tokio::test]
    async fn test_load_deck_replaces_state() {
        let session = session();
        session.apply(DeckOperation::ChangeTitle("Old".into()));

        let deck = session
            .load_deck(b"Starters\nsv3pt5-1\nsv3pt5-1\nsv3pt5-10")
            .await
            .unwrap();

        assert_eq!(deck.title, "Starters");
        assert_eq!(deck.count_named("Bulbasaur"), 2);
        assert_eq!(session.current_deck(), deck);
        assert!(!session.has_undo());
    }

    #[tokio::test]
    async fn test_load_deck_reports_every_bad_line() {
        let session = session();
        session.apply(DeckOperation::ChangeTitle("Keep".into()));
        let before = session.state();

        let err = session
            .load_deck(b"Broken\nsv3pt5-1\nnope-1\nsv3pt5-4\nnope-2")
            .await
            .unwrap_err();

        let FileFormatError::Unresolved(lines) = err else {
            panic!("expected unresolved lines, got {err:?}");
        };
        let failed: Vec<(usize, &str)> = lines
            .iter()
            .map(|l| (l.line, l.identifier.as_str()))
            .collect();
        assert_eq!(failed, vec![(3, "nope-1"), (5, "nope-2")]);
        assert_eq!(session.state(), before);
    }

    #[tokio::test]
    async fn test_load_empty_bytes() {
        let session = session();
        let err = session.load_deck(b"").await.unwrap_err();
        assert!(matches!(err, FileFormatError::Empty));
        assert_eq!(session.current_deck(), Deck::initial());
    }
}
