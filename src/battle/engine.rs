//! Execution of a single combatant's action against the session state.

use crate::battle::calculators::{calculate_damage, roll_critical, DamageInput};
use crate::battle::report::{ActionReport, HitReport, MoveReport, StageChangeReport};
use crate::battle::state::BattleSession;
use crate::battle::stats::{effective_attack, effective_defense, move_hits};
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::errors::{ActionError, BattleResult, PreconditionError};
use crate::rng::BattleRng;
use crate::type_chart::TypeChart;
use schema::{DamageClass, MoveData, MoveId, MoveTarget};

/// Power of the typeless physical blow a confused creature deals itself.
pub const CONFUSION_SELF_HIT_POWER: u16 = 40;

/// Read-only collaborators of a turn, threaded explicitly through resolution.
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    pub catalog: &'a dyn Catalog,
    pub types: &'a TypeChart,
    pub config: &'a EngineConfig,
}

impl<'a> EngineContext<'a> {
    pub fn new(catalog: &'a dyn Catalog, types: &'a TypeChart, config: &'a EngineConfig) -> Self {
        Self {
            catalog,
            types,
            config,
        }
    }
}

/// Checks that `slot` names a healthy creature other than the active one.
pub fn check_switch_target(session: &BattleSession, side: usize, slot: usize) -> BattleResult<()> {
    let Some(target) = session.trainers[side].party.get(slot) else {
        return Err(ActionError::NoCreatureInSlot(slot).into());
    };
    if slot == session.active_slot(side) {
        return Err(PreconditionError::SwitchToActive(slot).into());
    }
    if session.hp_of(target) == 0 {
        return Err(PreconditionError::SwitchToFainted(slot).into());
    }
    Ok(())
}

/// Brings in the creature at `slot`. The outgoing creature loses its stages and confusion.
pub fn execute_switch(
    session: &mut BattleSession,
    side: usize,
    slot: usize,
) -> BattleResult<ActionReport> {
    check_switch_target(session, side, slot)?;

    let from_slot = session.active_slot(side);
    let outgoing = session.active(side)?.id;
    if let Some(info) = session.pokemon_info.get_mut(&outgoing) {
        info.clear_volatile();
    }
    session.infos[side].curr_slot = slot;

    log::debug!(
        "battle {}: side {} switched slot {} -> {}",
        session.battle.id,
        side,
        from_slot,
        slot
    );

    Ok(ActionReport::Switch {
        side,
        from_slot,
        to_slot: slot,
    })
}

/// Runs one move of `side`'s active creature against the opposing active creature.
///
/// Draw order: confusion, hit count, then per hit accuracy and crit, then
/// ailment, flinch and stat change gates. Gates whose effect cannot apply
/// (no ailment slot free, fainted target) make no draw.
pub fn execute_move(
    session: &mut BattleSession,
    side: usize,
    move_id: MoveId,
    ctx: &EngineContext<'_>,
    rng: &mut dyn BattleRng,
) -> BattleResult<ActionReport> {
    let foe = 1 - side;
    let attacker = session.active(side)?.clone();
    let defender = session.active(foe)?.clone();

    let attacker_start = session.info_of(&attacker);
    if attacker_start.is_fainted() {
        return Ok(ActionReport::FaintedCannotAct {
            side,
            pokemon: attacker.id,
        });
    }
    let defender_start = session.info_of(&defender);

    let move_data = ctx.catalog.fetch_move(move_id)?;
    let mut report = MoveReport::new(side, attacker.id, defender.id, move_id);
    log::debug!(
        "battle {}: {} uses {} on {}",
        session.battle.id,
        attacker.name,
        move_data.name,
        defender.name
    );

    if attacker_start.confused
        && rng.chance(ctx.config.confusion_self_hit_chance, "confusion self-hit")
    {
        let damage = calculate_damage(DamageInput {
            level: attacker.level,
            power: CONFUSION_SELF_HIT_POWER,
            attack: effective_attack(&attacker, &attacker_start, DamageClass::Physical),
            defense: effective_defense(&attacker, &attacker_start, DamageClass::Physical),
            stab: false,
            effectiveness: 1.0,
            critical: false,
        });
        let dealt = session.active_info_mut(side)?.take_damage(damage);
        report.confusion_damage = Some(dealt);
    } else {
        let landed = run_hits(session, side, &move_data, &mut report, ctx, rng)?;
        if landed {
            apply_secondary_effects(session, side, &move_data, &mut report, ctx, rng)?;
        }
    }

    let attacker_end = session.active_info(side)?;
    let defender_end = session.active_info(foe)?;
    report.attacker_hp_delta = attacker_end.curr_hp as i32 - attacker_start.curr_hp as i32;
    report.defender_hp_delta = defender_end.curr_hp as i32 - defender_start.curr_hp as i32;
    report.attacker_fainted = attacker_end.is_fainted();
    report.defender_fainted = defender_end.is_fainted();

    Ok(ActionReport::Move(report))
}

/// Accuracy, damage and crit for every hit. Returns whether the move landed.
fn run_hits(
    session: &mut BattleSession,
    side: usize,
    move_data: &MoveData,
    report: &mut MoveReport,
    ctx: &EngineContext<'_>,
    rng: &mut dyn BattleRng,
) -> BattleResult<bool> {
    let foe = 1 - side;
    let targets_self = move_data.target == MoveTarget::User;
    if !targets_self && session.active_info(foe)?.is_fainted() {
        return Ok(false);
    }
    let (min_hits, max_hits) = move_data.hit_range();
    let hit_count = rng.draw_inclusive(min_hits as u32, max_hits as u32, "hit count");

    let attacker = session.active(side)?.clone();
    let defender = session.active(foe)?.clone();
    let mut landed = false;

    for _ in 0..hit_count {
        let attacker_info = session.info_of(&attacker);
        let defender_info = session.info_of(&defender);

        if !targets_self && !move_hits(move_data, &attacker_info, &defender_info, rng) {
            report.missed = report.hits.is_empty();
            break;
        }
        landed = true;

        if !move_data.is_damaging() {
            break;
        }

        let effectiveness = ctx.types.effectiveness(move_data.move_type, &defender.types);
        if effectiveness == 0.0 {
            report.immune = true;
            return Ok(false);
        }

        let critical = roll_critical(move_data.crit_rate, ctx.config, rng);
        let damage = calculate_damage(DamageInput {
            level: attacker.level,
            power: move_data.power,
            attack: effective_attack(&attacker, &attacker_info, move_data.damage_class),
            defense: effective_defense(&defender, &defender_info, move_data.damage_class),
            stab: attacker.has_type(move_data.move_type),
            effectiveness,
            critical,
        });

        let target = session.active_info_mut(foe)?;
        let dealt = target.take_damage(damage);
        let fainted = target.is_fainted();
        report.hits.push(HitReport {
            damage: dealt,
            critical,
            effectiveness,
        });

        if fainted {
            break;
        }
    }

    Ok(landed)
}

fn apply_secondary_effects(
    session: &mut BattleSession,
    side: usize,
    move_data: &MoveData,
    report: &mut MoveReport,
    ctx: &EngineContext<'_>,
    rng: &mut dyn BattleRng,
) -> BattleResult<()> {
    let foe = 1 - side;
    let effect_side = if move_data.target == MoveTarget::User {
        side
    } else {
        foe
    };

    if let Some(ailment) = move_data.ailment {
        let target = session.active_info(effect_side)?;
        if !target.is_fainted()
            && target.can_receive(ailment)
            && rng.chance(move_data.effective_ailment_chance(), "ailment")
            && session.active_info_mut(effect_side)?.inflict(ailment)
        {
            report.ailment = Some(ailment);
        }
    }

    if move_data.flinch_chance > 0
        && effect_side == foe
        && !session.active_info(foe)?.is_fainted()
        && rng.chance(move_data.flinch_chance, "flinch")
    {
        report.flinched = true;
    }

    if !move_data.stat_changes.is_empty()
        && !session.active_info(effect_side)?.is_fainted()
        && rng.chance(move_data.effective_stat_chance(), "stat change")
    {
        let pokemon = session.active(effect_side)?.id;
        let clamp = ctx.config.clamp_stat_stages;
        let info = session.active_info_mut(effect_side)?;
        for change in &move_data.stat_changes {
            let delta = info.stages.apply(change.stat, change.change, clamp);
            report.stage_changes.push(StageChangeReport {
                pokemon,
                stat: change.stat,
                delta,
            });
        }
    }

    let max_hp = session.active(side)?.max_hp();
    let dealt = report.total_damage();
    if move_data.drain != 0 && dealt > 0 {
        let amount = percent_of(dealt, move_data.drain.unsigned_abs());
        let info = session.active_info_mut(side)?;
        if move_data.drain > 0 {
            report.drained = info.restore_hp(amount, max_hp);
        } else {
            report.recoil += info.take_damage(amount);
        }
    }

    if move_data.healing != 0 && !session.active_info(side)?.is_fainted() {
        let amount = percent_of(max_hp as u32, move_data.healing.unsigned_abs());
        let info = session.active_info_mut(side)?;
        if move_data.healing > 0 {
            report.healed = info.restore_hp(amount, max_hp);
        } else {
            report.recoil += info.take_damage(amount);
        }
    }

    Ok(())
}

/// `percent`% of `value`, at least 1.
fn percent_of(value: u32, percent: u8) -> u16 {
    (value * percent as u32 / 100).clamp(1, u16::MAX as u32) as u16
}
