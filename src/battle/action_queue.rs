//! Per-turn action submission. Each side holds at most one queued action;
//! the turn resolves once both sides have one.

use crate::battle::catch::can_attempt_catch;
use crate::battle::engine::{check_switch_target, EngineContext};
use crate::battle::state::{BattleAction, BattleSession};
use crate::errors::{ActionError, BattleResult, CatalogError, PreconditionError};
use crate::rng::BattleRng;

/// Rejects actions the side's current state cannot perform.
pub fn validate_action(
    session: &BattleSession,
    side: usize,
    action: BattleAction,
    ctx: &EngineContext<'_>,
) -> BattleResult<()> {
    match action {
        BattleAction::Move(move_id) => {
            let active = session.active(side)?;
            if session.hp_of(active) == 0 {
                return Err(PreconditionError::FaintedCannotAct.into());
            }
            if !active.knows_move(move_id) {
                return Err(ActionError::MoveNotKnown(move_id).into());
            }
            match ctx.catalog.fetch_move(move_id) {
                Ok(_) => Ok(()),
                Err(CatalogError::MoveNotFound(_)) => Err(ActionError::UnknownMove(move_id).into()),
                Err(other) => Err(other.into()),
            }
        }
        BattleAction::Switch(slot) => check_switch_target(session, side, slot),
        BattleAction::Catch => {
            if session.active_info(side)?.is_fainted() {
                return Err(PreconditionError::FaintedCannotAct.into());
            }
            can_attempt_catch(session, side)
        }
    }
}

/// Queues `action` for `side`, replacing anything queued earlier this turn.
pub fn submit(
    session: &mut BattleSession,
    side: usize,
    action: BattleAction,
    ctx: &EngineContext<'_>,
) -> BattleResult<()> {
    validate_action(session, side, action, ctx)?;

    let info = &mut session.infos[side];
    if info.next_action.is_some() {
        log::debug!(
            "battle {}: side {} replaced its queued action",
            session.battle.id,
            side
        );
    }
    info.next_action = Some(action);
    info.finished_turn = true;
    Ok(())
}

pub fn is_ready(session: &BattleSession) -> bool {
    session
        .infos
        .iter()
        .all(|info| info.finished_turn && info.next_action.is_some())
}

/// Fills in actions for AI-controlled sides that have not chosen yet.
pub fn auto_assign(
    session: &mut BattleSession,
    ctx: &EngineContext<'_>,
    rng: &mut dyn BattleRng,
) -> BattleResult<()> {
    for side in 0..2 {
        let kind = session.trainers[side].kind;
        if !kind.is_ai() || session.infos[side].finished_turn {
            continue;
        }
        if let Some(action) = kind.select_action(side, session, ctx, rng)? {
            let info = &mut session.infos[side];
            info.next_action = Some(action);
            info.finished_turn = true;
        }
    }
    Ok(())
}

/// Clears the turn flags. Queued actions are overwritten next turn, never replayed.
pub fn reset(session: &mut BattleSession) {
    for info in session.infos.iter_mut() {
        info.finished_turn = false;
        info.next_action = None;
    }
}
