use crate::pokemon::Pokemon;

/// Divisor of the base experience formula.
const EXP_DIVISOR: u32 = 7;

/// Experience awarded for knocking out `fainted`: `baseExp · level / 7`,
/// scaled by `trainer_bonus` when the loser belonged to a trainer.
pub fn experience_for_defeat(fainted: &Pokemon, trainer_battle: bool, trainer_bonus: f64) -> u32 {
    let base = fainted.base_exp as u32 * fainted.level as u32 / EXP_DIVISOR;
    if trainer_battle {
        (base as f64 * trainer_bonus).floor() as u32
    } else {
        base
    }
}
