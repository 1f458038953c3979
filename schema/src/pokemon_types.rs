use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
    Typeless,
}

/// A single defensive modifier: damage of `attacking` type is scaled by `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeMod {
    pub attacking: PokemonType,
    pub multiplier: f32,
}

/// A defending type and every modifier that applies to it.
/// Attacking types without an entry deal neutral damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: PokemonType,
    pub modifiers: Vec<TypeMod>,
}

impl TypeEntry {
    pub fn new(name: PokemonType) -> Self {
        Self {
            name,
            modifiers: Vec::new(),
        }
    }

    /// Multiplier applied to `attacking` when it hits this type.
    pub fn multiplier_against(&self, attacking: PokemonType) -> f32 {
        self.modifiers
            .iter()
            .find(|m| m.attacking == attacking)
            .map(|m| m.multiplier)
            .unwrap_or(1.0)
    }
}
