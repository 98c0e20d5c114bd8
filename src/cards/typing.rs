//! Card typings (Grass, Fire, ...) and their capability sets.
//!
//! A typing tag can be valid on a Pokemon, on an Energy card, or both.
//! Rather than one flat enum plus runtime checks, the two capability sets
//! are separate types:
//!
//! - `PokemonType`: every typing a Pokemon may have (includes Dragon and
//!   Colorless).
//! - `EnergyType`: the subset an Energy card may provide.
//!
//! Every `EnergyType` is also a `PokemonType` (`From`); the reverse is a
//! fallible `TryFrom`.

use serde::{Deserialize, Serialize};

const ICON_BASE: &str = "https://archives.bulbagarden.net/media/upload/thumb";

/// Typing of a Pokemon card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PokemonType {
    Grass,
    Water,
    Fire,
    Lightning,
    Fighting,
    Psychic,
    Darkness,
    Metal,
    Dragon,
    Colorless,
}

/// Typing an Energy card can provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyType {
    Grass,
    Water,
    Fire,
    Lightning,
    Fighting,
    Psychic,
    Darkness,
    Metal,
}

impl PokemonType {
    /// All Pokemon typings.
    pub const ALL: [PokemonType; 10] = [
        PokemonType::Grass,
        PokemonType::Water,
        PokemonType::Fire,
        PokemonType::Lightning,
        PokemonType::Fighting,
        PokemonType::Psychic,
        PokemonType::Darkness,
        PokemonType::Metal,
        PokemonType::Dragon,
        PokemonType::Colorless,
    ];

    /// Display name, as printed on the card.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PokemonType::Grass => "Grass",
            PokemonType::Water => "Water",
            PokemonType::Fire => "Fire",
            PokemonType::Lightning => "Lightning",
            PokemonType::Fighting => "Fighting",
            PokemonType::Psychic => "Psychic",
            PokemonType::Darkness => "Darkness",
            PokemonType::Metal => "Metal",
            PokemonType::Dragon => "Dragon",
            PokemonType::Colorless => "Colorless",
        }
    }

    /// Whether this typing can also be provided by an Energy card.
    #[must_use]
    pub fn is_energy(self) -> bool {
        EnergyType::try_from(self).is_ok()
    }

    /// Small icon for rendering the typing next to a card.
    #[must_use]
    pub fn icon_url(self) -> String {
        let path = match self {
            PokemonType::Grass => "2/2e/Grass-attack.png",
            PokemonType::Water => "1/11/Water-attack.png",
            PokemonType::Fire => "a/ad/Fire-attack.png",
            PokemonType::Lightning => "0/04/Lightning-attack.png",
            PokemonType::Fighting => "4/48/Fighting-attack.png",
            PokemonType::Psychic => "e/ef/Psychic-attack.png",
            PokemonType::Darkness => "a/ab/Darkness-attack.png",
            PokemonType::Metal => "6/64/Metal-attack.png",
            PokemonType::Dragon => "8/8a/Dragon-attack.png",
            PokemonType::Colorless => "1/1d/Colorless-attack.png",
        };
        let file = path.rsplit('/').next().unwrap_or(path);
        format!("{ICON_BASE}/{path}/40px-{file}")
    }
}

impl EnergyType {
    /// All Energy typings.
    pub const ALL: [EnergyType; 8] = [
        EnergyType::Grass,
        EnergyType::Water,
        EnergyType::Fire,
        EnergyType::Lightning,
        EnergyType::Fighting,
        EnergyType::Psychic,
        EnergyType::Darkness,
        EnergyType::Metal,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        PokemonType::from(self).name()
    }

    #[must_use]
    pub fn icon_url(self) -> String {
        PokemonType::from(self).icon_url()
    }
}

impl From<EnergyType> for PokemonType {
    fn from(value: EnergyType) -> Self {
        match value {
            EnergyType::Grass => PokemonType::Grass,
            EnergyType::Water => PokemonType::Water,
            EnergyType::Fire => PokemonType::Fire,
            EnergyType::Lightning => PokemonType::Lightning,
            EnergyType::Fighting => PokemonType::Fighting,
            EnergyType::Psychic => PokemonType::Psychic,
            EnergyType::Darkness => PokemonType::Darkness,
            EnergyType::Metal => PokemonType::Metal,
        }
    }
}

/// Returned when a Pokemon-only typing is used where an Energy typing is required.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not an energy type")]
pub struct NotAnEnergyType(pub PokemonType);

impl TryFrom<PokemonType> for EnergyType {
    type Error = NotAnEnergyType;

    fn try_from(value: PokemonType) -> Result<Self, Self::Error> {
        match value {
            PokemonType::Grass => Ok(EnergyType::Grass),
            PokemonType::Water => Ok(EnergyType::Water),
            PokemonType::Fire => Ok(EnergyType::Fire),
            PokemonType::Lightning => Ok(EnergyType::Lightning),
            PokemonType::Fighting => Ok(EnergyType::Fighting),
            PokemonType::Psychic => Ok(EnergyType::Psychic),
            PokemonType::Darkness => Ok(EnergyType::Darkness),
            PokemonType::Metal => Ok(EnergyType::Metal),
            PokemonType::Dragon | PokemonType::Colorless => Err(NotAnEnergyType(value)),
        }
    }
}
