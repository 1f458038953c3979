// Battle Schema - Shared type definitions
// Plain data shared between the battle engine and whatever provides its
// catalog data. Nothing in here touches battle state.

pub use move_data::*;
pub use move_types::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod move_data;
pub mod move_types;
pub mod pokemon_types;
pub mod species_data;

/// Catalog key of a move.
pub type MoveId = u16;

/// Catalog key of a creature species.
pub type SpeciesId = u16;
