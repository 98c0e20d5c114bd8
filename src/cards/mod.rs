//! Card system: definitions, typings, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Catalog identifier, `"<set>-<number>"`
//! - `Card`: Pokemon, Energy or Trainer card (sum type)
//! - `Category`: Card category with its stage or kind
//! - `PokemonType` / `EnergyType`: Typing capability sets
//! - `CardRegistry`: In-memory catalog

pub mod definition;
pub mod registry;
pub mod typing;

pub use definition::{
    Card, CardId, Category, EnergyCard, EnergyCategory, PokemonCard, PokemonStage, TrainerCard,
    TrainerCategory,
};
pub use registry::CardRegistry;
pub use typing::{EnergyType, NotAnEnergyType, PokemonType};
