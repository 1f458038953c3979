use crate::battle::report::BattleOutcome;
use crate::battle::state::BattleSession;
use crate::trainer::{Trainer, TrainerId};

/// Checks whether either party has been wiped out. Both at once is a draw.
pub fn detect(session: &BattleSession) -> Option<BattleOutcome> {
    let [first, second] = session.battle.participants;
    match (session.party_wiped(0), session.party_wiped(1)) {
        (true, true) => Some(BattleOutcome::Draw),
        (true, false) => Some(BattleOutcome::Winner {
            winner: second,
            loser: first,
        }),
        (false, true) => Some(BattleOutcome::Winner {
            winner: first,
            loser: second,
        }),
        (false, false) => None,
    }
}

pub fn forfeit(session: &BattleSession, side: usize) -> BattleOutcome {
    BattleOutcome::Forfeit {
        winner: session.battle.participants[1 - side],
        loser: session.battle.participants[side],
    }
}

/// Updates win/loss/draw counters and releases both trainers.
/// A capture ends the battle without touching any counter.
pub fn apply_outcome(session: &mut BattleSession, outcome: &BattleOutcome) {
    match outcome {
        BattleOutcome::Winner { winner, loser } | BattleOutcome::Forfeit { winner, loser } => {
            credit(session, *winner, |t| t.wins += 1);
            credit(session, *loser, |t| t.losses += 1);
        }
        BattleOutcome::Draw => {
            for trainer in session.trainers.iter_mut() {
                trainer.draws += 1;
            }
        }
        BattleOutcome::Captured { .. } => {}
    }

    for trainer in session.trainers.iter_mut() {
        trainer.battling = false;
    }
    log::info!("battle {} ended: {:?}", session.battle.id, outcome);
}

fn credit(session: &mut BattleSession, id: TrainerId, update: impl FnOnce(&mut Trainer)) {
    if let Some(side) = session.battle.side_of(id) {
        update(&mut session.trainers[side]);
    }
}
