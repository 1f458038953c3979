//! Which of the two queued actions resolves first.

use crate::battle::engine::EngineContext;
use crate::battle::state::{BattleAction, BattleSession};
use crate::battle::stats::effective_speed;
use crate::config::SpeedTieRule;
use crate::errors::BattleResult;
use crate::trainer::TrainerId;

/// Coarse ordering bucket; higher tiers always act first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionTier {
    Move,
    Switch,
    Catch,
}

impl From<BattleAction> for ActionTier {
    fn from(action: BattleAction) -> Self {
        match action {
            BattleAction::Move(_) => ActionTier::Move,
            BattleAction::Switch(_) => ActionTier::Switch,
            BattleAction::Catch => ActionTier::Catch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub tier: ActionTier,
    pub priority: i8,
    pub speed: u16,
    pub participant: TrainerId,
}

/// Side (0 or 1) whose action goes first.
pub fn first_actor(keys: &[OrderKey; 2], initiator: usize, rule: SpeedTieRule) -> usize {
    let [a, b] = keys;
    if a.tier != b.tier {
        return if a.tier > b.tier { 0 } else { 1 };
    }

    match a.tier {
        ActionTier::Catch => {
            log::warn!("both sides queued a catch; resolving initiator first");
            initiator
        }
        ActionTier::Switch => initiator,
        ActionTier::Move => {
            if a.priority != b.priority {
                return if a.priority > b.priority { 0 } else { 1 };
            }
            if a.speed != b.speed {
                return if a.speed > b.speed { 0 } else { 1 };
            }
            match rule {
                SpeedTieRule::LowerParticipantId => {
                    if a.participant <= b.participant {
                        0
                    } else {
                        1
                    }
                }
                SpeedTieRule::Initiator => initiator,
            }
        }
    }
}

fn order_key(
    session: &BattleSession,
    side: usize,
    action: BattleAction,
    ctx: &EngineContext<'_>,
) -> BattleResult<OrderKey> {
    let active = session.active(side)?;
    let priority = match action {
        BattleAction::Move(move_id) => ctx.catalog.fetch_move(move_id)?.priority,
        _ => 0,
    };
    Ok(OrderKey {
        tier: action.into(),
        priority,
        speed: effective_speed(active, &session.info_of(active)),
        participant: session.trainers[side].id,
    })
}

/// Resolution order of the two queued actions as `[first, second]`.
pub fn order_actions(
    session: &BattleSession,
    actions: [BattleAction; 2],
    initiator: usize,
    ctx: &EngineContext<'_>,
) -> BattleResult<[usize; 2]> {
    let keys = [
        order_key(session, 0, actions[0], ctx)?,
        order_key(session, 1, actions[1], ctx)?,
    ];
    let first = first_actor(&keys, initiator, ctx.config.speed_tie);
    Ok([first, 1 - first])
}
