use crate::config::EngineConfig;
use crate::rng::BattleRng;

pub const STAB_MULTIPLIER: f32 = 1.5;
pub const CRITICAL_MULTIPLIER: u32 = 2;

/// Everything the damage formula reads, already resolved to numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInput {
    pub level: u8,
    pub power: u16,
    pub attack: u16,
    pub defense: u16,
    pub stab: bool,
    pub effectiveness: f32,
    pub critical: bool,
}

/// `floor(floor(floor(2L/5 + 2) · P · A / D) / 50) + 2`, then same-type
/// bonus, then effectiveness, then the critical doubling.
///
/// Returns 0 only for immunity; any other hit deals at least 1.
pub fn calculate_damage(input: DamageInput) -> u16 {
    if input.effectiveness == 0.0 {
        return 0;
    }

    let level_factor = 2 * input.level as u32 / 5 + 2;
    let defense = input.defense.max(1) as u32;
    let base = level_factor * input.power as u32 * input.attack as u32 / defense / 50 + 2;

    let mut damage = base as f32;
    if input.stab {
        damage = (damage * STAB_MULTIPLIER).floor();
    }
    damage = (damage * input.effectiveness).floor();

    let mut damage = (damage as u32).max(1);
    if input.critical {
        damage *= CRITICAL_MULTIPLIER;
    }

    damage.min(u16::MAX as u32) as u16
}

/// One-in-N critical roll for a move's crit tier. A denominator of 1 makes no draw.
pub fn roll_critical(crit_rate: u8, config: &EngineConfig, rng: &mut dyn BattleRng) -> bool {
    let denominator = config.crit_denominator(crit_rate);
    if denominator <= 1 {
        return true;
    }
    rng.draw(denominator, "critical hit") == 0
}
