//! Card definitions - immutable card values.
//!
//! A card is one of three kinds, modelled as a sum type:
//!
//! - `PokemonCard`: has an evolution stage, a `PokemonType`, and optionally
//!   the name of the Pokemon it evolves from.
//! - `EnergyCard`: Basic or Special, provides an `EnergyType`.
//! - `TrainerCard`: Item, Tool, Supporter or Stadium.
//!
//! Cards are compared by `(category, name, identifier)` so that any
//! collection of cards has one deterministic display order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::typing::{EnergyType, PokemonType};

const IMAGE_BASE: &str = "https://images.pokemontcg.io";

/// Unique card identifier in the catalog, formatted `"<set>-<number>"`.
///
/// Two printings of the same card (same name) have different identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The set code (text before the first `-`), if the identifier is well formed.
    #[must_use]
    pub fn set(&self) -> Option<&str> {
        self.parts().map(|(set, _)| set)
    }

    /// The collector number within the set (text after the first `-`).
    #[must_use]
    pub fn number(&self) -> Option<&str> {
        self.parts().map(|(_, number)| number)
    }

    fn parts(&self) -> Option<(&str, &str)> {
        self.0
            .split_once('-')
            .filter(|(set, number)| !set.is_empty() && !number.is_empty())
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Evolution stage of a Pokemon. Ordered `Basic < Stage1 < Stage2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PokemonStage {
    Basic,
    Stage1,
    Stage2,
}

impl PokemonStage {
    /// All stages, lowest first.
    pub const ALL: [PokemonStage; 3] = [PokemonStage::Basic, PokemonStage::Stage1, PokemonStage::Stage2];

    /// The stage a Pokemon of this stage evolves from. `None` for Basic.
    #[must_use]
    pub const fn previous(self) -> Option<PokemonStage> {
        match self {
            PokemonStage::Basic => None,
            PokemonStage::Stage1 => Some(PokemonStage::Basic),
            PokemonStage::Stage2 => Some(PokemonStage::Stage1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyCategory {
    Basic,
    Special,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrainerCategory {
    Item,
    Tool,
    Supporter,
    Stadium,
}

/// Card category. Orders Pokemon before Energy before Trainer, then by
/// the inner stage or kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Pokemon(PokemonStage),
    Energy(EnergyCategory),
    Trainer(TrainerCategory),
}

/// A Pokemon card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PokemonCard {
    pub id: CardId,
    pub name: String,
    pub stage: PokemonStage,
    pub typing: PokemonType,

    /// Name of the Pokemon this one evolves from. A back-reference by
    /// name only; used for evolution-chain validation.
    pub evolves_from: Option<String>,
}

impl PokemonCard {
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        stage: PokemonStage,
        typing: PokemonType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stage,
            typing,
            evolves_from: None,
        }
    }

    /// Set the name this Pokemon evolves from (builder pattern).
    #[must_use]
    pub fn evolves_from(mut self, name: impl Into<String>) -> Self {
        self.evolves_from = Some(name.into());
        self
    }
}

/// An Energy card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyCard {
    pub id: CardId,
    pub name: String,
    pub kind: EnergyCategory,
    pub typing: EnergyType,
}

impl EnergyCard {
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        kind: EnergyCategory,
        typing: EnergyType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            typing,
        }
    }
}

/// A Trainer card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainerCard {
    pub id: CardId,
    pub name: String,
    pub kind: TrainerCategory,
}

impl TrainerCard {
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, kind: TrainerCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Any card in the catalog.
///
/// ## Example
///
/// ```
/// use rust_tcg::cards::{Card, PokemonCard, PokemonStage, PokemonType};
///
/// let ivysaur: Card = PokemonCard::new("sv3pt5-2", "Ivysaur", PokemonStage::Stage1, PokemonType::Grass)
///     .evolves_from("Bulbasaur")
///     .into();
///
/// assert_eq!(ivysaur.name(), "Ivysaur");
/// assert_eq!(ivysaur.id().set(), Some("sv3pt5"));
/// assert!(!ivysaur.is_basic_pokemon());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Pokemon(PokemonCard),
    Energy(EnergyCard),
    Trainer(TrainerCard),
}

impl Card {
    #[must_use]
    pub fn id(&self) -> &CardId {
        match self {
            Card::Pokemon(card) => &card.id,
            Card::Energy(card) => &card.id,
            Card::Trainer(card) => &card.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Card::Pokemon(card) => &card.name,
            Card::Energy(card) => &card.name,
            Card::Trainer(card) => &card.name,
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Card::Pokemon(card) => Category::Pokemon(card.stage),
            Card::Energy(card) => Category::Energy(card.kind),
            Card::Trainer(card) => Category::Trainer(card.kind),
        }
    }

    /// The card as a Pokemon, if it is one.
    #[must_use]
    pub fn as_pokemon(&self) -> Option<&PokemonCard> {
        match self {
            Card::Pokemon(card) => Some(card),
            _ => None,
        }
    }

    /// Is this a Basic Pokemon (a valid starter)?
    #[must_use]
    pub fn is_basic_pokemon(&self) -> bool {
        matches!(self, Card::Pokemon(card) if card.stage == PokemonStage::Basic)
    }

    /// Is this a Basic Energy card?
    #[must_use]
    pub fn is_basic_energy(&self) -> bool {
        matches!(self, Card::Energy(card) if card.kind == EnergyCategory::Basic)
    }

    /// High resolution card scan, derived from the identifier.
    ///
    /// `None` when the identifier is not of the form `"<set>-<number>"`.
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        let id = self.id();
        let (set, number) = (id.set()?, id.number()?);
        Some(format!("{IMAGE_BASE}/{set}/{number}_hires.png"))
    }
}

impl From<PokemonCard> for Card {
    fn from(card: PokemonCard) -> Self {
        Card::Pokemon(card)
    }
}

impl From<EnergyCard> for Card {
    fn from(card: EnergyCard) -> Self {
        Card::Energy(card)
    }
}

impl From<TrainerCard> for Card {
    fn from(card: TrainerCard) -> Self {
        Card::Trainer(card)
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category()
            .cmp(&other.category())
            .then_with(|| self.name().cmp(other.name()))
            .then_with(|| self.id().cmp(other.id()))
            // Cards equal on the display key but differing elsewhere still need
            // a total order consistent with `Eq`.
            .then_with(|| self.typing_key().cmp(&other.typing_key()))
            .then_with(|| self.evolves_from().cmp(&other.evolves_from()))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Card {
    fn typing_key(&self) -> Option<PokemonType> {
        match self {
            Card::Pokemon(card) => Some(card.typing),
            Card::Energy(card) => Some(card.typing.into()),
            Card::Trainer(_) => None,
        }
    }

    fn evolves_from(&self) -> Option<&str> {
        self.as_pokemon().and_then(|p| p.evolves_from.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur() -> Card {
        PokemonCard::new("sv3pt5-1", "Bulbasaur", PokemonStage::Basic, PokemonType::Grass).into()
    }

    #[test]
    fn test_card_id_parts() {
        let id = CardId::new("sv3pt5-10");
        assert_eq!(id.set(), Some("sv3pt5"));
        assert_eq!(id.number(), Some("10"));
        assert_eq!(format!("{}", id), "sv3pt5-10");

        let malformed = CardId::new("nodash");
        assert_eq!(malformed.set(), None);
        assert_eq!(CardId::new("-5").set(), None);
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            bulbasaur().image_url().as_deref(),
            Some("https://images.pokemontcg.io/sv3pt5/1_hires.png")
        );

        let bad: Card = TrainerCard::new("broken", "Potion", TrainerCategory::Item).into();
        assert_eq!(bad.image_url(), None);
    }

    #[test]
    fn test_stage_previous() {
        assert_eq!(PokemonStage::Basic.previous(), None);
        assert_eq!(PokemonStage::Stage1.previous(), Some(PokemonStage::Basic));
        assert_eq!(PokemonStage::Stage2.previous(), Some(PokemonStage::Stage1));
    }

    #[test]
    fn test_category_order() {
        assert!(Category::Pokemon(PokemonStage::Stage2) < Category::Energy(EnergyCategory::Basic));
        assert!(Category::Energy(EnergyCategory::Special) < Category::Trainer(TrainerCategory::Item));
        assert!(Category::Pokemon(PokemonStage::Basic) < Category::Pokemon(PokemonStage::Stage1));
    }

    #[test]
    fn test_card_order() {
        let energy: Card =
            EnergyCard::new("sve-2", "Fire Energy", EnergyCategory::Basic, EnergyType::Fire).into();
        let potion: Card = TrainerCard::new("sv1-188", "Potion", TrainerCategory::Item).into();
        let charmander: Card =
            PokemonCard::new("sv3pt5-4", "Charmander", PokemonStage::Basic, PokemonType::Fire).into();

        let mut cards = vec![potion.clone(), energy.clone(), charmander.clone(), bulbasaur()];
        cards.sort();

        assert_eq!(cards, vec![bulbasaur(), charmander, energy, potion]);
    }

    #[test]
    fn test_same_name_orders_by_identifier() {
        let a: Card = PokemonCard::new("sv1-1", "Pikachu", PokemonStage::Basic, PokemonType::Lightning).into();
        let b: Card = PokemonCard::new("sv2-1", "Pikachu", PokemonStage::Basic, PokemonType::Lightning).into();
        assert!(a < b);
    }

    #[test]
    fn test_predicates() {
        assert!(bulbasaur().is_basic_pokemon());
        assert!(!bulbasaur().is_basic_energy());

        let special: Card =
            EnergyCard::new("sv2-190", "Jet Energy", EnergyCategory::Special, EnergyType::Metal).into();
        assert!(!special.is_basic_energy());
        assert_eq!(special.category(), Category::Energy(EnergyCategory::Special));
    }

    #[test]
    fn test_card_serialization() {
        let card = bulbasaur();
        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);
    }
}
