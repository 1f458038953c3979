use crate::rng::BattleRng;
use schema::Ailment;

/// Exclusive upper bound of a catch roll.
pub const CATCH_ROLL_BOUND: u32 = 256;

/// Capture score: `((3·maxHP − 2·currHP) · catchRate / (3·maxHP)) · ailmentBonus`.
///
/// The roll succeeds when a uniform draw in [0, 256) is at most this score,
/// so lower HP and a status ailment both make a catch easier.
pub fn capture_score(max_hp: u16, curr_hp: u16, catch_rate: u8, ailment: Option<Ailment>) -> f64 {
    let max_hp = max_hp.max(1) as f64;
    let curr_hp = (curr_hp as f64).min(max_hp);
    let bonus = ailment.map(Ailment::catch_bonus).unwrap_or(1.0);

    // multiply before dividing so whole scores stay whole
    (3.0 * max_hp - 2.0 * curr_hp) * catch_rate as f64 / (3.0 * max_hp) * bonus
}

/// Exact success probability of a single roll against `score`.
pub fn catch_probability(score: f64) -> f64 {
    let winning_rolls = (score.floor() + 1.0).clamp(0.0, CATCH_ROLL_BOUND as f64);
    winning_rolls / CATCH_ROLL_BOUND as f64
}

/// Roll for catch success. Returns the outcome and the roll drawn.
pub fn roll_catch_success(score: f64, rng: &mut dyn BattleRng) -> (bool, u32) {
    let roll = rng.draw(CATCH_ROLL_BOUND, "catch roll");
    (roll as f64 <= score, roll)
}
