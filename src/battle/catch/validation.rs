use crate::battle::state::BattleSession;
use crate::errors::{BattleResult, PreconditionError};
use crate::trainer::CombatantKind;

/// Catching is only allowed against wild opponents.
pub fn is_catch_allowed(opponent: CombatantKind) -> bool {
    matches!(opponent, CombatantKind::Wild)
}

/// Validate that `side` may throw at the opposing active creature.
///
/// A full party is not checked here: it is a reported outcome of the attempt,
/// not a rejection.
pub fn can_attempt_catch(session: &BattleSession, side: usize) -> BattleResult<()> {
    let opponent = &session.trainers[1 - side];
    if !is_catch_allowed(opponent.kind) {
        return Err(PreconditionError::CatchNonWild.into());
    }
    Ok(())
}

/// Whether the catcher's party is already at the ceiling.
pub fn party_is_full(session: &BattleSession, side: usize, limit: usize) -> bool {
    session.trainers[side].party.len() >= limit
}
