use crate::battle::state::{PokemonBattleInfo, MAX_STAGE, MIN_STAGE};
use crate::pokemon::Pokemon;
use crate::rng::BattleRng;
use schema::{Ailment, DamageClass, MoveData, StageStat, Stat};

/// Calculate effective attack stat for a move, including stages and burn.
pub fn effective_attack(pokemon: &Pokemon, info: &PokemonBattleInfo, class: DamageClass) -> u16 {
    let (stat, stage_stat) = match class {
        DamageClass::Physical => (Stat::Attack, StageStat::Attack),
        DamageClass::Special => (Stat::SpAttack, StageStat::SpAttack),
        DamageClass::Status => return 0,
    };

    let mut attack = apply_stat_stage_multiplier(pokemon.stat(stat), info.stages.get(stage_stat));

    // Burn halves physical attack
    if class == DamageClass::Physical && info.ailment == Some(Ailment::Burn) {
        attack /= 2;
    }

    attack.max(1)
}

/// Calculate effective defense stat for a move, including stages.
pub fn effective_defense(pokemon: &Pokemon, info: &PokemonBattleInfo, class: DamageClass) -> u16 {
    let (stat, stage_stat) = match class {
        DamageClass::Physical => (Stat::Defense, StageStat::Defense),
        DamageClass::Special => (Stat::SpDefense, StageStat::SpDefense),
        DamageClass::Status => return 0,
    };

    apply_stat_stage_multiplier(pokemon.stat(stat), info.stages.get(stage_stat)).max(1)
}

/// Calculate effective speed including stat stages and paralysis.
pub fn effective_speed(pokemon: &Pokemon, info: &PokemonBattleInfo) -> u16 {
    let mut speed = apply_stat_stage_multiplier(pokemon.stat(Stat::Speed), info.stages.speed);

    // Apply paralysis (quarter speed)
    if info.ailment == Some(Ailment::Paralysis) {
        speed /= 4;
    }

    speed
}

/// Rolls whether a move hits. Accuracy 0 never misses and makes no draw.
pub fn move_hits(
    move_data: &MoveData,
    attacker: &PokemonBattleInfo,
    defender: &PokemonBattleInfo,
    rng: &mut dyn BattleRng,
) -> bool {
    if move_data.accuracy == 0 {
        return true;
    }

    // Calculate adjusted stages: attacker's accuracy - defender's evasion
    let adjusted_stage = (attacker.stages.accuracy as i16 - defender.stages.evasion as i16)
        .clamp(MIN_STAGE as i16, MAX_STAGE as i16) as i8;

    let modified_accuracy =
        (move_data.accuracy as f64 * apply_accuracy_stage_multiplier(adjusted_stage)).round();
    let clamped_accuracy = modified_accuracy.clamp(1.0, 100.0) as u8;

    rng.chance(clamped_accuracy, "accuracy")
}

/// Accuracy/evasion stages use thirds rather than halves.
pub fn apply_accuracy_stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(MIN_STAGE, MAX_STAGE) as f64;
    if stage >= 0.0 {
        (3.0 + stage) / 3.0
    } else {
        3.0 / (3.0 - stage)
    }
}

/// Negative stages: 2 / (2 + |stage|). Positive stages: (2 + stage) / 2.
/// Stages outside [-6, 6] read as the nearest bound.
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let clamped_stage = stage.clamp(MIN_STAGE, MAX_STAGE);

    if clamped_stage == 0 {
        return base_stat;
    }

    let multiplier = if clamped_stage < 0 {
        2.0 / (2.0 + (-clamped_stage) as f64)
    } else {
        (2.0 + clamped_stage as f64) / 2.0
    };

    ((base_stat as f64) * multiplier).round() as u16
}
