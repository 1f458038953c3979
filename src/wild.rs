//! Wild encounter tables and spawning.
//!
//! A region lists tiers of encounters; a tier becomes available once the
//! trainer holds `unlock_at` badges. The encounter is a weighted draw over
//! every unlocked entry, and its level lands within the configured spread
//! of the entry's median.

use crate::config::EngineConfig;
use crate::errors::{ActionError, BattleEngineError, BattleResult};
use crate::pokemon::{Pokemon, PokemonId};
use crate::rng::BattleRng;
use schema::{CreatureTemplate, SpeciesId};
use serde::{Deserialize, Serialize};

/// Highest individual value a freshly spawned creature can roll.
const MAX_IV: u32 = 31;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildEntry {
    pub species_id: SpeciesId,
    pub weight: u32,
    pub median_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildTier {
    pub unlock_at: u8,
    pub entries: Vec<WildEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildRegion {
    pub name: String,
    pub tiers: Vec<WildTier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WildTables {
    pub regions: Vec<WildRegion>,
}

impl WildTables {
    /// Parses tables and rejects any region whose weights cannot be summed.
    pub fn from_ron_str(text: &str) -> BattleResult<Self> {
        let tables: Self = ron::from_str(text)
            .map_err(|e| BattleEngineError::Config(format!("wild tables: {}", e)))?;
        for region in &tables.regions {
            let entries = region.tiers.iter().flat_map(|tier| tier.entries.iter());
            total_weight(entries, &region.name)?;
        }
        Ok(tables)
    }

    pub fn region(&self, name: &str) -> Option<&WildRegion> {
        self.regions.iter().find(|region| region.name == name)
    }
}

fn total_weight<'a>(
    entries: impl Iterator<Item = &'a WildEntry>,
    region: &str,
) -> BattleResult<u32> {
    let mut total: u32 = 0;
    for entry in entries {
        total = total.checked_add(entry.weight).ok_or_else(|| {
            BattleEngineError::Config(format!("wild tables: weights in {} overflow", region))
        })?;
    }
    Ok(total)
}

/// Picks the species and level of a wild encounter in `region`.
pub fn pick_encounter(
    tables: &WildTables,
    region: &str,
    badges: u8,
    config: &EngineConfig,
    rng: &mut dyn BattleRng,
) -> BattleResult<(SpeciesId, u8)> {
    let Some(region_data) = tables.region(region) else {
        return Err(ActionError::UnknownRegion(region.to_string()).into());
    };

    let available: Vec<&WildEntry> = region_data
        .tiers
        .iter()
        .filter(|tier| tier.unlock_at <= badges)
        .flat_map(|tier| tier.entries.iter())
        .filter(|entry| entry.weight > 0)
        .collect();
    let total = total_weight(available.iter().copied(), region)?;
    if total == 0 {
        return Err(ActionError::NoEncounters(region.to_string()).into());
    }

    let mut roll = rng.draw(total, "wild encounter");
    let mut chosen = available[available.len() - 1];
    for &entry in &available {
        if roll < entry.weight {
            chosen = entry;
            break;
        }
        roll -= entry.weight;
    }

    let spread = config.wild_level_spread as i32;
    let offset = rng.draw_inclusive(0, (spread * 2) as u32, "wild level") as i32 - spread;
    let level = (chosen.median_level as i32 + offset).clamp(1, config.max_level as i32) as u8;

    log::debug!(
        "wild encounter in {}: species {} at level {}",
        region,
        chosen.species_id,
        level
    );
    Ok((chosen.species_id, level))
}

/// Uniform IVs in `0..=31` for every stat.
pub fn roll_ivs(rng: &mut dyn BattleRng) -> [u8; 6] {
    let mut ivs = [0u8; 6];
    for iv in ivs.iter_mut() {
        *iv = rng.draw(MAX_IV + 1, "iv") as u8;
    }
    ivs
}

/// Builds a creature with random IVs knowing its most recent level-up moves.
pub fn spawn_wild(
    id: PokemonId,
    template: &CreatureTemplate,
    level: u8,
    config: &EngineConfig,
    rng: &mut dyn BattleRng,
) -> Pokemon {
    let ivs = roll_ivs(rng);
    Pokemon::from_template(id, template, level, ivs, config.move_slots)
}
