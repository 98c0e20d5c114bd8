//! Undo/redo history tests.

use proptest::prelude::*;
use rust_tcg::cards::{Card, PokemonCard, PokemonStage, PokemonType, TrainerCard, TrainerCategory};
use rust_tcg::deck::{Deck, DeckOperation, DeckState, HistoryConfig};

fn oddish() -> Card {
    PokemonCard::new("sv1-1", "Oddish", PokemonStage::Basic, PokemonType::Grass).into()
}

fn potion() -> Card {
    TrainerCard::new("sv1-188", "Potion", TrainerCategory::Item).into()
}

// =============================================================================
// Laws
// =============================================================================

#[test]
fn test_undo_undo_redo_equals_prefix() {
    let a = DeckOperation::ChangeTitle("Garden".into());
    let b = DeckOperation::AddCard(oddish());
    let c = DeckOperation::AddCard(potion());

    let replayed = DeckState::default().reduce_all([
        a.clone(),
        b.clone(),
        c,
        DeckOperation::Undo,
        DeckOperation::Undo,
        DeckOperation::Redo,
    ]);
    let prefix = DeckState::default().reduce_all([a, b]);

    assert_eq!(replayed.deck(), prefix.deck());
}

#[test]
fn test_edit_after_undo_discards_redo() {
    let state = DeckState::default().reduce_all([
        DeckOperation::AddCard(oddish()),
        DeckOperation::AddCard(potion()),
        DeckOperation::Undo,
        DeckOperation::AddCard(oddish()),
    ]);
    assert!(!state.has_redo());

    let after_redo = state.reduce(DeckOperation::Redo);
    assert_eq!(after_redo, state);
    assert_eq!(after_redo.deck().count_named("Oddish"), 2);
    assert_eq!(after_redo.deck().count_named("Potion"), 0);
}

#[test]
fn test_undo_to_beginning() {
    let state = DeckState::default().reduce_all([
        DeckOperation::AddCard(oddish()),
        DeckOperation::AddCard(oddish()),
        DeckOperation::RemoveCard(oddish()),
    ]);
    assert_eq!(state.deck().len(), 1);

    let state = state.reduce_all([DeckOperation::Undo, DeckOperation::Undo, DeckOperation::Undo]);
    assert_eq!(state.deck(), &Deck::initial());
    assert!(!state.has_undo());
    assert_eq!(state.future().len(), 3);
}

#[test]
fn test_remove_card_removes_single_copy() {
    let state = DeckState::default().reduce_all([
        DeckOperation::AddCard(potion()),
        DeckOperation::AddCard(potion()),
        DeckOperation::AddCard(potion()),
        DeckOperation::RemoveCard(potion()),
    ]);
    assert_eq!(state.deck().count_named("Potion"), 2);
}

#[test]
fn test_previous_state_unchanged() {
    let before = DeckState::default().reduce(DeckOperation::AddCard(oddish()));
    let snapshot = before.clone();

    let _after = before.reduce(DeckOperation::Clear);
    assert_eq!(before, snapshot);
}

#[test]
fn test_bounded_history() {
    let config = HistoryConfig::default().with_capacity(3);
    let state = DeckState::new(Deck::initial(), &config)
        .reduce_all((0..10).map(|i| DeckOperation::ChangeTitle(format!("v{i}"))));

    assert_eq!(state.past().len(), 3);
    assert_eq!(state.deck().title, "v9");

    let undone = state.reduce_all(std::iter::repeat(DeckOperation::Undo).take(10));
    assert_eq!(undone.deck().title, "v6");
    assert_eq!(undone.future().len(), 3);
}

// =============================================================================
// Properties
// =============================================================================

fn arb_edit() -> impl Strategy<Value = DeckOperation> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(DeckOperation::ChangeTitle),
        Just(DeckOperation::AddCard(oddish())),
        Just(DeckOperation::AddCard(potion())),
        Just(DeckOperation::RemoveCard(oddish())),
        Just(DeckOperation::Clear),
    ]
}

fn arb_operation() -> impl Strategy<Value = DeckOperation> {
    prop_oneof![
        3 => arb_edit(),
        1 => Just(DeckOperation::Undo),
        1 => Just(DeckOperation::Redo),
    ]
}

proptest! {
    /// Undo after any edit restores the deck before it.
    #[test]
    fn prop_undo_inverts_edit(
        history in prop::collection::vec(arb_operation(), 0..30),
        edit in arb_edit(),
    ) {
        let state = DeckState::default().reduce_all(history);
        let undone = state.reduce(edit).reduce(DeckOperation::Undo);
        prop_assert_eq!(undone.deck(), state.deck());
    }

    /// Redo after undo restores the deck before the undo.
    #[test]
    fn prop_redo_inverts_undo(history in prop::collection::vec(arb_operation(), 0..30)) {
        let state = DeckState::default().reduce_all(history);
        prop_assume!(state.has_undo());

        let redone = state.reduce(DeckOperation::Undo).reduce(DeckOperation::Redo);
        prop_assert_eq!(redone.deck(), state.deck());
    }

    /// An edit always leaves nothing to redo.
    #[test]
    fn prop_edit_clears_future(
        history in prop::collection::vec(arb_operation(), 0..30),
        edit in arb_edit(),
    ) {
        let state = DeckState::default().reduce_all(history).reduce(edit);
        prop_assert!(!state.has_redo());
    }

    /// Stacks never exceed capacity.
    #[test]
    fn prop_capacity_respected(
        capacity in 0usize..5,
        history in prop::collection::vec(arb_operation(), 0..40),
    ) {
        let config = HistoryConfig::default().with_capacity(capacity);
        let state = DeckState::new(Deck::initial(), &config).reduce_all(history);
        prop_assert!(state.past().len() <= capacity);
        prop_assert!(state.future().len() <= capacity);
    }
}
