use crate::errors::{BattleEngineError, BattleResult};
use schema::{PokemonType, TypeEntry, TypeMod};
use std::collections::HashMap;

/// Immutable type-effectiveness lookup, built once and passed to whatever
/// computes damage.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChart {
    entries: HashMap<PokemonType, TypeEntry>,
}

use PokemonType::*;

// (defending type, [(attacking type, multiplier)])
const STANDARD_CHART: &[(PokemonType, &[(PokemonType, f32)])] = &[
    (Normal, &[(Fighting, 2.0), (Ghost, 0.0)]),
    (
        Fighting,
        &[(Flying, 2.0), (Psychic, 2.0), (Fairy, 2.0), (Rock, 0.5), (Bug, 0.5), (Dark, 0.5)],
    ),
    (
        Flying,
        &[(Electric, 2.0), (Ice, 2.0), (Rock, 2.0), (Fighting, 0.5), (Bug, 0.5), (Grass, 0.5), (Ground, 0.0)],
    ),
    (
        Poison,
        &[(Ground, 2.0), (Psychic, 2.0), (Fighting, 0.5), (Poison, 0.5), (Bug, 0.5), (Grass, 0.5), (Fairy, 0.5)],
    ),
    (
        Ground,
        &[(Water, 2.0), (Grass, 2.0), (Ice, 2.0), (Poison, 0.5), (Rock, 0.5), (Electric, 0.0)],
    ),
    (
        Rock,
        &[
            (Fighting, 2.0),
            (Ground, 2.0),
            (Steel, 2.0),
            (Water, 2.0),
            (Grass, 2.0),
            (Normal, 0.5),
            (Flying, 0.5),
            (Poison, 0.5),
            (Fire, 0.5),
        ],
    ),
    (
        Bug,
        &[(Flying, 2.0), (Rock, 2.0), (Fire, 2.0), (Fighting, 0.5), (Ground, 0.5), (Grass, 0.5)],
    ),
    (
        Ghost,
        &[(Ghost, 2.0), (Dark, 2.0), (Poison, 0.5), (Bug, 0.5), (Normal, 0.0), (Fighting, 0.0)],
    ),
    (
        Steel,
        &[
            (Fighting, 2.0),
            (Ground, 2.0),
            (Fire, 2.0),
            (Normal, 0.5),
            (Flying, 0.5),
            (Rock, 0.5),
            (Bug, 0.5),
            (Steel, 0.5),
            (Grass, 0.5),
            (Psychic, 0.5),
            (Ice, 0.5),
            (Dragon, 0.5),
            (Fairy, 0.5),
            (Poison, 0.0),
        ],
    ),
    (
        Fire,
        &[
            (Ground, 2.0),
            (Rock, 2.0),
            (Water, 2.0),
            (Bug, 0.5),
            (Steel, 0.5),
            (Fire, 0.5),
            (Grass, 0.5),
            (Ice, 0.5),
            (Fairy, 0.5),
        ],
    ),
    (
        Water,
        &[(Grass, 2.0), (Electric, 2.0), (Steel, 0.5), (Fire, 0.5), (Water, 0.5), (Ice, 0.5)],
    ),
    (
        Grass,
        &[
            (Flying, 2.0),
            (Poison, 2.0),
            (Bug, 2.0),
            (Fire, 2.0),
            (Ice, 2.0),
            (Ground, 0.5),
            (Water, 0.5),
            (Grass, 0.5),
            (Electric, 0.5),
        ],
    ),
    (Electric, &[(Ground, 2.0), (Flying, 0.5), (Steel, 0.5), (Electric, 0.5)]),
    (
        Psychic,
        &[(Bug, 2.0), (Ghost, 2.0), (Dark, 2.0), (Fighting, 0.5), (Psychic, 0.5)],
    ),
    (
        Ice,
        &[(Fighting, 2.0), (Rock, 2.0), (Steel, 2.0), (Fire, 2.0), (Ice, 0.5)],
    ),
    (
        Dragon,
        &[(Ice, 2.0), (Dragon, 2.0), (Fairy, 2.0), (Fire, 0.5), (Water, 0.5), (Grass, 0.5), (Electric, 0.5)],
    ),
    (
        Dark,
        &[(Fighting, 2.0), (Bug, 2.0), (Fairy, 2.0), (Ghost, 0.5), (Dark, 0.5), (Psychic, 0.0)],
    ),
    (
        Fairy,
        &[(Poison, 2.0), (Steel, 2.0), (Fighting, 0.5), (Bug, 0.5), (Dark, 0.5), (Dragon, 0.0)],
    ),
    (Typeless, &[]),
];

impl TypeChart {
    /// The modern eighteen-type chart.
    pub fn standard() -> Self {
        let entries = STANDARD_CHART.iter().map(|(defending, mods)| TypeEntry {
            name: *defending,
            modifiers: mods
                .iter()
                .map(|(attacking, multiplier)| TypeMod {
                    attacking: *attacking,
                    multiplier: *multiplier,
                })
                .collect(),
        });
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TypeEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.name, e)).collect(),
        }
    }

    /// Parses a RON list of `TypeEntry` values.
    pub fn from_ron_str(text: &str) -> BattleResult<Self> {
        let entries: Vec<TypeEntry> =
            ron::from_str(text).map_err(|e| BattleEngineError::Config(e.to_string()))?;
        Ok(Self::from_entries(entries))
    }

    /// Product of the multipliers of `attacking` against every defending type.
    /// Types missing from the chart are neutral.
    pub fn effectiveness(&self, attacking: PokemonType, defending: &[PokemonType]) -> f32 {
        defending
            .iter()
            .map(|t| {
                self.entries
                    .get(t)
                    .map(|entry| entry.multiplier_against(attacking))
                    .unwrap_or(1.0)
            })
            .product()
    }
}
