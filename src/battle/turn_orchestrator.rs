//! Resolves one full turn: ordering, both actions, residual damage,
//! experience and the end-of-battle check.

use crate::battle::action_queue;
use crate::battle::catch::execute_catch;
use crate::battle::engine::{execute_move, execute_switch, EngineContext};
use crate::battle::outcome::{apply_outcome, detect};
use crate::battle::report::{ActionReport, BattleOutcome, CatchResult, ResidualReport, TurnReport};
use crate::battle::state::{BattleAction, BattleSession};
use crate::battle::turn_order::order_actions;
use crate::errors::{invariant, BattleResult, InvariantError};
use crate::pokemon::Pokemon;
use crate::progression::{experience_for_defeat, gain_experience};
use crate::rng::BattleRng;
use crate::trainer::CombatantKind;
use schema::Ailment;

/// Residual damage is this fraction of max HP.
const RESIDUAL_DIVISOR: u16 = 8;

/// Runs the turn once both sides have queued an action. `initiator` is the
/// side whose submission completed the turn.
pub fn resolve_turn(
    session: &mut BattleSession,
    initiator: usize,
    ctx: &EngineContext<'_>,
    rng: &mut dyn BattleRng,
) -> BattleResult<TurnReport> {
    let actions = queued_actions(session)?;
    let order = order_actions(session, actions, initiator, ctx)?;
    let mut report = TurnReport::new(session.battle.id.clone(), session.battle.turn, order);
    log::debug!(
        "battle {}: resolving turn {} in order {:?}",
        session.battle.id,
        session.battle.turn,
        order
    );

    let second = order[1];
    let second_alive_at_start = !session.active_info(second)?.is_fainted();
    let mut knockouts: Vec<(usize, Pokemon)> = Vec::new();
    let mut first_flinched = false;
    let mut capture: Option<BattleOutcome> = None;

    for (position, &side) in order.iter().enumerate() {
        let action = actions[side];
        if position == 1 {
            if second_alive_at_start && session.active_info(side)?.is_fainted() {
                report.actions.push(ActionReport::Skipped { side });
                continue;
            }
            if first_flinched && matches!(action, BattleAction::Move(_)) {
                let pokemon = session.active(side)?.id;
                report.actions.push(ActionReport::Flinched { side, pokemon });
                continue;
            }
        }

        let defender = session.active(1 - side)?.clone();
        let action_report = match action {
            BattleAction::Move(move_id) => execute_move(session, side, move_id, ctx, rng)?,
            BattleAction::Switch(slot) => execute_switch(session, side, slot)?,
            BattleAction::Catch => execute_catch(session, side, ctx, rng)?,
        };

        match &action_report {
            ActionReport::Move(outcome) => {
                if outcome.defender_fainted && outcome.defender_hp_delta < 0 {
                    knockouts.push((side, defender));
                }
                if position == 0 {
                    first_flinched = outcome.flinched;
                }
            }
            ActionReport::Catch(attempt) if attempt.result == CatchResult::Caught => {
                capture = Some(BattleOutcome::Captured {
                    catcher: session.trainers[side].id,
                    pokemon: attempt.target,
                });
            }
            _ => {}
        }
        report.actions.push(action_report);

        if capture.is_some() {
            break;
        }
    }

    if capture.is_none() && ctx.config.residual_damage {
        apply_residual(session, &mut report)?;
    }

    award_experience(session, &knockouts, ctx, &mut report)?;

    report.outcome = capture.or_else(|| detect(session));
    match &report.outcome {
        Some(outcome) => apply_outcome(session, outcome),
        None => action_queue::reset(session),
    }
    session.battle.turn += 1;

    Ok(report)
}

fn queued_actions(session: &BattleSession) -> BattleResult<[BattleAction; 2]> {
    let queued = |side: usize| {
        let info = &session.infos[side];
        info.next_action
            .filter(|_| info.finished_turn)
            .ok_or_else(|| invariant(InvariantError::TurnNotReady(session.battle.id.clone())))
    };
    Ok([queued(0)?, queued(1)?])
}

/// Poison and burn chip away an eighth of max HP from each living active creature.
fn apply_residual(session: &mut BattleSession, report: &mut TurnReport) -> BattleResult<()> {
    for side in 0..2 {
        let pokemon = session.active(side)?;
        let (id, max_hp) = (pokemon.id, pokemon.max_hp());
        let info = session.active_info_mut(side)?;
        let ailment = match info.ailment {
            Some(ailment @ (Ailment::Poison | Ailment::Burn)) if !info.is_fainted() => ailment,
            _ => continue,
        };

        let damage = info.take_damage((max_hp / RESIDUAL_DIVISOR).max(1));
        report.residual.push(ResidualReport {
            side,
            pokemon: id,
            ailment,
            damage,
            fainted: info.is_fainted(),
        });
    }
    Ok(())
}

/// Grants experience for every creature knocked out by an opposing move.
/// Only human-owned creatures still standing earn it.
fn award_experience(
    session: &mut BattleSession,
    knockouts: &[(usize, Pokemon)],
    ctx: &EngineContext<'_>,
    report: &mut TurnReport,
) -> BattleResult<()> {
    for (victor, fainted) in knockouts {
        let victor = *victor;
        if session.trainers[victor].kind != CombatantKind::Human
            || session.active_info(victor)?.is_fainted()
        {
            continue;
        }

        let trainer_battle = session.trainers[1 - victor].kind != CombatantKind::Wild;
        let amount = experience_for_defeat(fainted, trainer_battle, ctx.config.trainer_exp_bonus);
        let slot = session.active_slot(victor);
        let trainer_id = session.trainers[victor].id;
        let Some(pokemon) = session.trainers[victor].party.get_mut(slot) else {
            return Err(invariant(InvariantError::NoActiveCreature {
                trainer: trainer_id,
                slot,
            }));
        };

        let template = ctx.catalog.fetch_creature(pokemon.species_id)?;
        let old_max_hp = pokemon.max_hp();
        let leveling = gain_experience(pokemon, amount, &template, ctx.config);
        let hp_gain = pokemon.max_hp().saturating_sub(old_max_hp);
        let (id, max_hp) = (pokemon.id, pokemon.max_hp());

        // current HP rises with max HP on level-up
        if hp_gain > 0 {
            if let Some(info) = session.pokemon_info.get_mut(&id) {
                info.restore_hp(hp_gain, max_hp);
            }
        }

        log::info!(
            "battle {}: creature {} gained {} experience",
            session.battle.id,
            id,
            leveling.experience_gained
        );
        report.leveling.push(leveling);
    }
    Ok(())
}
