use crate::{Ailment, DamageClass, MoveId, MoveTarget, PokemonType, StageStat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: StageStat,
    pub change: i8,
}

/// Immutable catalog entry for a move.
///
/// Chance fields are percentages. A chance of 0 on a field whose effect is
/// present (an ailment, or stat changes) means the effect always applies,
/// which is how the source data encodes guaranteed secondary effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: MoveId,
    pub name: String,
    pub move_type: PokemonType,
    pub power: u16,
    /// 0 means the move never misses.
    pub accuracy: u8,
    pub priority: i8,
    pub damage_class: DamageClass,
    pub target: MoveTarget,
    pub ailment: Option<Ailment>,
    pub ailment_chance: u8,
    pub flinch_chance: u8,
    pub stat_changes: Vec<StatChange>,
    pub stat_chance: u8,
    pub min_hits: Option<u8>,
    pub max_hits: Option<u8>,
    /// Percent of damage dealt returned to the user. Negative values are recoil.
    pub drain: i8,
    /// Percent of the user's max HP restored. Negative values hurt the user.
    pub healing: i8,
    /// Critical hit tier, 0 for ordinary moves.
    pub crit_rate: u8,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.damage_class != DamageClass::Status && self.power > 0
    }

    /// Inclusive hit range. Single-hit moves return `(1, 1)`.
    pub fn hit_range(&self) -> (u8, u8) {
        let min = self.min_hits.unwrap_or(1).max(1);
        let max = self.max_hits.unwrap_or(min).max(min);
        (min, max)
    }

    /// Chance used for the ailment gate, resolving the "0 means certain" encoding.
    pub fn effective_ailment_chance(&self) -> u8 {
        match (self.ailment, self.ailment_chance) {
            (None, _) => 0,
            (Some(_), 0) => 100,
            (Some(_), chance) => chance.min(100),
        }
    }

    /// Chance used for the stat change gate, resolving the "0 means certain" encoding.
    pub fn effective_stat_chance(&self) -> u8 {
        match (self.stat_changes.is_empty(), self.stat_chance) {
            (true, _) => 0,
            (false, 0) => 100,
            (false, chance) => chance.min(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn growl() -> MoveData {
        MoveData {
            id: 45,
            name: "growl".to_string(),
            move_type: PokemonType::Normal,
            power: 0,
            accuracy: 100,
            priority: 0,
            damage_class: DamageClass::Status,
            target: MoveTarget::Opponent,
            ailment: None,
            ailment_chance: 0,
            flinch_chance: 0,
            stat_changes: vec![StatChange {
                stat: StageStat::Attack,
                change: -1,
            }],
            stat_chance: 0,
            min_hits: None,
            max_hits: None,
            drain: 0,
            healing: 0,
            crit_rate: 0,
        }
    }

    #[test]
    fn zero_chance_with_effect_means_certain() {
        let growl = growl();
        assert_eq!(growl.effective_stat_chance(), 100);
        assert_eq!(growl.effective_ailment_chance(), 0);
        assert!(!growl.is_damaging());
    }

    #[test]
    fn hit_range_defaults_to_single_hit() {
        let mut data = growl();
        assert_eq!(data.hit_range(), (1, 1));

        data.min_hits = Some(2);
        data.max_hits = Some(5);
        assert_eq!(data.hit_range(), (2, 5));

        data.max_hits = None;
        assert_eq!(data.hit_range(), (2, 2));
    }
}
