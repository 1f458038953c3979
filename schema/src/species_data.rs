use crate::{MoveId, PokemonType, SpeciesId, Stat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpAttack => self.sp_attack,
            Stat::SpDefense => self.sp_defense,
            Stat::Speed => self.speed,
        }
    }

    pub fn total(&self) -> u16 {
        self.hp as u16
            + self.attack as u16
            + self.defense as u16
            + self.sp_attack as u16
            + self.sp_defense as u16
            + self.speed as u16
    }
}

/// Experience curve classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthRate {
    Erratic,
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
    Fluctuating,
}

/// A move taught on reaching `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMove {
    pub level: u8,
    pub move_id: MoveId,
}

/// Species data as served by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub catch_rate: u8,
    pub base_exp: u16,
    pub growth_rate: GrowthRate,
    pub learnset: Vec<LevelMove>,
}

impl CreatureTemplate {
    /// Moves taught at exactly `level`, in learnset order.
    pub fn moves_learned_at(&self, level: u8) -> Vec<MoveId> {
        self.learnset
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.move_id)
            .collect()
    }

    /// The most recent `slots` distinct moves learned at or below `level`.
    pub fn default_moves(&self, level: u8, slots: usize) -> Vec<MoveId> {
        let mut entries: Vec<&LevelMove> = self
            .learnset
            .iter()
            .filter(|entry| entry.level <= level)
            .collect();
        entries.sort_by_key(|entry| entry.level);

        let mut learned: Vec<MoveId> = Vec::new();
        for entry in entries {
            learned.retain(|id| *id != entry.move_id);
            learned.push(entry.move_id);
        }

        let skip = learned.len().saturating_sub(slots);
        learned.into_iter().skip(skip).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn template() -> CreatureTemplate {
        CreatureTemplate {
            id: 25,
            name: "pikachu".to_string(),
            types: vec![PokemonType::Electric],
            base_stats: BaseStats {
                hp: 35,
                attack: 55,
                defense: 40,
                sp_attack: 50,
                sp_defense: 50,
                speed: 90,
            },
            catch_rate: 190,
            base_exp: 112,
            growth_rate: GrowthRate::MediumFast,
            learnset: vec![
                LevelMove { level: 1, move_id: 84 },
                LevelMove { level: 1, move_id: 45 },
                LevelMove { level: 6, move_id: 39 },
                LevelMove { level: 8, move_id: 86 },
                LevelMove { level: 11, move_id: 98 },
                LevelMove { level: 11, move_id: 104 },
            ],
        }
    }

    #[test]
    fn default_moves_keep_most_recent() {
        let t = template();
        assert_eq!(t.default_moves(5, 4), vec![84, 45]);
        assert_eq!(t.default_moves(11, 4), vec![39, 86, 98, 104]);
    }

    #[test]
    fn moves_learned_at_level() {
        let t = template();
        assert_eq!(t.moves_learned_at(11), vec![98, 104]);
        assert!(t.moves_learned_at(10).is_empty());
    }

    #[test]
    fn base_stat_total() {
        assert_eq!(template().base_stats.total(), 320);
    }
}
