use crate::battle::catch::{can_attempt_catch, capture_score, party_is_full, roll_catch_success};
use crate::battle::engine::EngineContext;
use crate::battle::report::{ActionReport, CatchReport, CatchResult};
use crate::battle::state::BattleSession;
use crate::errors::BattleResult;
use crate::rng::BattleRng;

/// Throws at the opposing active creature.
///
/// On success the target's HP is forced to 0 and a copy joins the catcher's
/// party. A full party is reported without drawing.
pub fn execute_catch(
    session: &mut BattleSession,
    side: usize,
    ctx: &EngineContext<'_>,
    rng: &mut dyn BattleRng,
) -> BattleResult<ActionReport> {
    can_attempt_catch(session, side)?;

    let foe = 1 - side;
    let target = session.active(foe)?.clone();
    let info = session.info_of(&target);
    let score = capture_score(target.max_hp(), info.curr_hp, target.catch_rate, info.ailment);

    let result = if party_is_full(session, side, ctx.config.party_size_limit) {
        CatchResult::PartyFull
    } else {
        match roll_catch_success(score, rng) {
            (true, _) => {
                session.active_info_mut(foe)?.curr_hp = 0;
                let mut caught = target.clone();
                caught.pending_move = None;
                session.trainers[side].party.push(caught);
                CatchResult::Caught
            }
            (false, roll) => CatchResult::Escaped { roll },
        }
    };

    log::info!(
        "battle {}: catch of {} by side {} scored {:.1}: {:?}",
        session.battle.id,
        target.name,
        side,
        score,
        result
    );

    Ok(ActionReport::Catch(CatchReport {
        side,
        target: target.id,
        score,
        result,
    }))
}
