use crate::progression::growth::experience_for_level;
use schema::{BaseStats, CreatureTemplate, GrowthRate, MoveId, PokemonType, SpeciesId, Stat};
use serde::{Deserialize, Serialize};

pub type PokemonId = u64;

/// A move the creature reached the level for but has no free slot to hold.
/// Leveling stays halted until the owner forgets a move or declines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMoveLearn {
    pub move_id: MoveId,
    /// The level being reached when the move is offered.
    pub level: u8,
}

/// An owned creature. Battle-scoped state (current HP, stages, ailments)
/// lives in `PokemonBattleInfo`, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    pub species_id: SpeciesId,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub ivs: [u8; 6],
    pub evs: [u8; 6],
    pub level: u8,
    pub experience: u32,
    pub growth_rate: GrowthRate,
    pub moves: Vec<MoveId>,
    pub catch_rate: u8,
    pub base_exp: u16,
    pub pending_move: Option<PendingMoveLearn>,
}

impl Pokemon {
    /// Builds a creature at `level` knowing the most recent `move_slots`
    /// moves of its learnset, with experience at the start of that level.
    pub fn from_template(
        id: PokemonId,
        template: &CreatureTemplate,
        level: u8,
        ivs: [u8; 6],
        move_slots: usize,
    ) -> Self {
        let level = level.max(1);
        Self {
            id,
            species_id: template.id,
            name: template.name.clone(),
            types: template.types.clone(),
            base_stats: template.base_stats.clone(),
            ivs,
            evs: [0; 6],
            level,
            experience: experience_for_level(template.growth_rate, level),
            growth_rate: template.growth_rate,
            moves: template.default_moves(level, move_slots),
            catch_rate: template.catch_rate,
            base_exp: template.base_exp,
            pending_move: None,
        }
    }

    /// Out-of-battle value of a stat at the current level.
    pub fn stat(&self, stat: Stat) -> u16 {
        calculate_stat(
            stat,
            self.base_stats.get(stat),
            self.ivs[stat.index()],
            self.evs[stat.index()],
            self.level,
        )
    }

    pub fn max_hp(&self) -> u16 {
        self.stat(Stat::Hp)
    }

    pub fn knows_move(&self, move_id: MoveId) -> bool {
        self.moves.contains(&move_id)
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }
}

/// HP:     (2·Base + IV + EV/4) · L / 100 + L + 10
/// Others: (2·Base + IV + EV/4) · L / 100 + 5
pub fn calculate_stat(stat: Stat, base: u8, iv: u8, ev: u8, level: u8) -> u16 {
    let base_calculation = 2 * base as u32 + iv as u32 + ev as u32 / 4;
    let scaled = base_calculation * level as u32 / 100;
    let value = match stat {
        Stat::Hp => scaled + level as u32 + 10,
        _ => scaled + 5,
    };
    value.min(u16::MAX as u32) as u16
}
