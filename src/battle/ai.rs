//! A module for defining AI behaviors for battle opponents.

use crate::battle::engine::EngineContext;
use crate::battle::state::{BattleAction, BattleSession};
use crate::errors::{invariant, BattleResult, InvariantError};
use crate::pokemon::Pokemon;
use crate::rng::BattleRng;
use crate::trainer::CombatantKind;
use ordered_float::OrderedFloat;
use schema::MoveData;

/// Same-type bonus as weighed by the scorer.
const STAB_WEIGHT: f32 = 1.5;

/// A trait for any system that can decide on a battle action.
pub trait Behavior {
    /// Picks the next action for `side`. The side's active creature is alive.
    fn decide_action(
        &self,
        side: usize,
        session: &BattleSession,
        ctx: &EngineContext<'_>,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<BattleAction>;
}

/// Wild creatures pick uniformly from their moveset.
pub struct RandomMoveAI;

impl Behavior for RandomMoveAI {
    fn decide_action(
        &self,
        side: usize,
        session: &BattleSession,
        _ctx: &EngineContext<'_>,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<BattleAction> {
        let active = known_moves(session, side)?;
        let index = rng.pick_index(active.moves.len(), "wild move choice");
        Ok(BattleAction::Move(active.moves[index]))
    }
}

/// Gym leaders take the move with the best expected damage.
pub struct ScoringAI;

impl ScoringAI {
    /// `power × effectiveness × STAB × accuracy`. Status moves score zero so
    /// any damaging move beats them.
    pub fn score_move(
        &self,
        move_data: &MoveData,
        attacker: &Pokemon,
        defender: &Pokemon,
        ctx: &EngineContext<'_>,
    ) -> f32 {
        if !move_data.is_damaging() {
            return 0.0;
        }

        let effectiveness = ctx.types.effectiveness(move_data.move_type, &defender.types);
        let stab = if attacker.has_type(move_data.move_type) {
            STAB_WEIGHT
        } else {
            1.0
        };
        let accuracy = match move_data.accuracy {
            0 => 1.0,
            value => value as f32 / 100.0,
        };

        move_data.power as f32 * effectiveness * stab * accuracy
    }
}

impl Behavior for ScoringAI {
    fn decide_action(
        &self,
        side: usize,
        session: &BattleSession,
        ctx: &EngineContext<'_>,
        _rng: &mut dyn BattleRng,
    ) -> BattleResult<BattleAction> {
        let attacker = known_moves(session, side)?;
        let defender = session.active(1 - side)?;

        let mut best: Option<(OrderedFloat<f32>, usize)> = None;
        for (index, move_id) in attacker.moves.iter().enumerate() {
            let move_data = ctx.catalog.fetch_move(*move_id)?;
            let score = OrderedFloat(self.score_move(&move_data, attacker, defender, ctx));
            // strictly greater keeps the earliest move on ties
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, index));
            }
        }

        let index = best.map_or(0, |(_, index)| index);
        Ok(BattleAction::Move(attacker.moves[index]))
    }
}

fn known_moves(session: &BattleSession, side: usize) -> BattleResult<&Pokemon> {
    let active = session.active(side)?;
    if active.moves.is_empty() {
        return Err(invariant(InvariantError::EmptyMoveset(active.id)));
    }
    Ok(active)
}

impl CombatantKind {
    /// The action an AI combatant takes this turn; `None` for humans.
    ///
    /// A fainted active creature is replaced with the first healthy one
    /// before any move is considered.
    pub fn select_action(
        self,
        side: usize,
        session: &BattleSession,
        ctx: &EngineContext<'_>,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<Option<BattleAction>> {
        if !self.is_ai() {
            return Ok(None);
        }

        if session.active_info(side)?.is_fainted() {
            return Ok(session.first_healthy_slot(side).map(BattleAction::Switch));
        }

        let action = match self {
            CombatantKind::GymLeader => ScoringAI.decide_action(side, session, ctx, rng)?,
            _ => RandomMoveAI.decide_action(side, session, ctx, rng)?,
        };
        Ok(Some(action))
    }
}
