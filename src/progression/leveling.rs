//! Level-ups and the move-learning decision.
//!
//! Experience is added immediately, but levels are taken one at a time. Each
//! level first teaches its moves; a move that does not fit halts the loop
//! with a pending decision stored on the creature, and the level itself is
//! only granted once that decision is resolved.

use crate::config::EngineConfig;
use crate::errors::{ActionError, BattleResult};
use crate::pokemon::{PendingMoveLearn, Pokemon, PokemonId};
use crate::progression::growth::experience_for_level;
use schema::{CreatureTemplate, MoveId};
use serde::{Deserialize, Serialize};

/// Answer to a pending move-learn decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveChoice {
    /// Replace the move in `slot` with the offered move.
    Forget { slot: usize },
    /// Keep the current moves; the level is still granted.
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedMove {
    pub level: u8,
    pub move_id: MoveId,
    pub replaced: Option<MoveId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelingReport {
    pub pokemon: PokemonId,
    pub experience_gained: u32,
    pub start_level: u8,
    pub end_level: u8,
    pub learned: Vec<LearnedMove>,
    pub declined: Vec<MoveId>,
    /// Set when leveling halted on a move that does not fit.
    pub pending: Option<PendingMoveLearn>,
}

impl LevelingReport {
    fn new(pokemon: &Pokemon, experience_gained: u32) -> Self {
        Self {
            pokemon: pokemon.id,
            experience_gained,
            start_level: pokemon.level,
            end_level: pokemon.level,
            learned: Vec::new(),
            declined: Vec::new(),
            pending: None,
        }
    }

    pub fn leveled_up(&self) -> bool {
        self.end_level > self.start_level
    }
}

/// Adds experience (capped at the max level's threshold) and advances levels.
pub fn gain_experience(
    pokemon: &mut Pokemon,
    amount: u32,
    template: &CreatureTemplate,
    config: &EngineConfig,
) -> LevelingReport {
    let cap = experience_for_level(pokemon.growth_rate, config.max_level);
    let before = pokemon.experience;
    pokemon.experience = pokemon.experience.saturating_add(amount).min(cap.max(before));

    let mut report = LevelingReport::new(pokemon, pokemon.experience - before);
    advance(pokemon, template, config, &mut report);
    report
}

/// Takes every level the creature's experience allows, stopping at the first
/// move conflict. Does nothing while a decision is pending.
pub fn advance(
    pokemon: &mut Pokemon,
    template: &CreatureTemplate,
    config: &EngineConfig,
    report: &mut LevelingReport,
) {
    while pokemon.pending_move.is_none()
        && pokemon.level < config.max_level
        && pokemon.experience >= experience_for_level(pokemon.growth_rate, pokemon.level + 1)
    {
        let next_level = pokemon.level + 1;
        if !teach_level_moves(pokemon, template, next_level, None, config, report) {
            break;
        }
        pokemon.level = next_level;
        report.end_level = next_level;
        log::info!("{} grew to level {}", pokemon.name, next_level);
    }
    report.pending = pokemon.pending_move;
}

/// Teaches the moves of `level` that come after `resume_after`. Returns false
/// when a move did not fit and a decision is now pending.
fn teach_level_moves(
    pokemon: &mut Pokemon,
    template: &CreatureTemplate,
    level: u8,
    resume_after: Option<MoveId>,
    config: &EngineConfig,
    report: &mut LevelingReport,
) -> bool {
    let offered = template.moves_learned_at(level);
    let start = resume_after
        .and_then(|id| offered.iter().position(|m| *m == id))
        .map(|index| index + 1)
        .unwrap_or(0);

    for &move_id in &offered[start.min(offered.len())..] {
        if pokemon.knows_move(move_id) {
            continue;
        }
        if pokemon.moves.len() < config.move_slots {
            pokemon.moves.push(move_id);
            report.learned.push(LearnedMove {
                level,
                move_id,
                replaced: None,
            });
            continue;
        }
        pokemon.pending_move = Some(PendingMoveLearn { move_id, level });
        log::info!(
            "{} wants to learn move {} at level {} but knows {} moves",
            pokemon.name,
            move_id,
            level,
            pokemon.moves.len()
        );
        return false;
    }
    true
}

/// Applies the owner's answer to a pending decision, grants the halted level,
/// and keeps leveling.
pub fn resolve_conflict(
    pokemon: &mut Pokemon,
    template: &CreatureTemplate,
    choice: MoveChoice,
    config: &EngineConfig,
) -> BattleResult<LevelingReport> {
    let Some(pending) = pokemon.pending_move else {
        return Err(ActionError::NoPendingDecision(pokemon.id).into());
    };

    let mut report = LevelingReport::new(pokemon, 0);
    match choice {
        MoveChoice::Forget { slot } => {
            let Some(old) = pokemon.moves.get(slot).copied() else {
                return Err(ActionError::InvalidForgetSlot(slot).into());
            };
            pokemon.moves[slot] = pending.move_id;
            report.learned.push(LearnedMove {
                level: pending.level,
                move_id: pending.move_id,
                replaced: Some(old),
            });
        }
        MoveChoice::Decline => report.declined.push(pending.move_id),
    }
    pokemon.pending_move = None;

    if teach_level_moves(
        pokemon,
        template,
        pending.level,
        Some(pending.move_id),
        config,
        &mut report,
    ) {
        pokemon.level = pending.level;
        report.end_level = pending.level;
        advance(pokemon, template, config, &mut report);
    } else {
        report.pending = pokemon.pending_move;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BattleEngineError;
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, GrowthRate, LevelMove, PokemonType};

    // Medium Fast: level n needs n^3 experience.
    fn template() -> CreatureTemplate {
        CreatureTemplate {
            id: 25,
            name: "pikachu".to_string(),
            types: vec![PokemonType::Electric],
            base_stats: BaseStats {
                hp: 35,
                attack: 55,
                defense: 40,
                sp_attack: 50,
                sp_defense: 50,
                speed: 90,
            },
            catch_rate: 190,
            base_exp: 112,
            growth_rate: GrowthRate::MediumFast,
            learnset: vec![
                LevelMove { level: 1, move_id: 84 },
                LevelMove { level: 1, move_id: 45 },
                LevelMove { level: 6, move_id: 39 },
                LevelMove { level: 8, move_id: 86 },
                LevelMove { level: 11, move_id: 98 },
                LevelMove { level: 11, move_id: 104 },
                LevelMove { level: 15, move_id: 21 },
            ],
        }
    }

    fn pikachu(level: u8) -> Pokemon {
        Pokemon::from_template(1, &template(), level, [0; 6], 4)
    }

    #[test]
    fn free_slots_are_filled_automatically() {
        let config = EngineConfig::default();
        let mut pokemon = pikachu(5);
        assert_eq!(pokemon.moves, vec![84, 45]);

        let report = gain_experience(&mut pokemon, 512 - 125, &template(), &config);

        assert_eq!(pokemon.level, 8);
        assert_eq!(pokemon.moves, vec![84, 45, 39, 86]);
        assert_eq!(report.start_level, 5);
        assert_eq!(report.end_level, 8);
        assert_eq!(report.learned.len(), 2);
        assert!(report.pending.is_none());
    }

    #[test]
    fn full_moveset_halts_before_the_level() {
        let config = EngineConfig::default();
        let mut pokemon = pikachu(10);
        assert_eq!(pokemon.moves.len(), 4);

        let report = gain_experience(&mut pokemon, 2000, &template(), &config);

        assert_eq!(pokemon.level, 10);
        assert_eq!(
            report.pending,
            Some(PendingMoveLearn {
                move_id: 98,
                level: 11
            })
        );
        assert_eq!(pokemon.pending_move, report.pending);
        assert!(!report.leveled_up());
    }

    #[test]
    fn forgetting_resumes_with_the_next_move_of_the_same_level() {
        let config = EngineConfig::default();
        let mut pokemon = pikachu(10);
        gain_experience(&mut pokemon, 2000, &template(), &config);

        let report =
            resolve_conflict(&mut pokemon, &template(), MoveChoice::Forget { slot: 0 }, &config)
                .expect("decision should apply");

        assert_eq!(report.learned[0].replaced, Some(84));
        assert_eq!(pokemon.moves[0], 98);
        // Quick Attack's sibling at level 11 conflicts next
        assert_eq!(
            pokemon.pending_move,
            Some(PendingMoveLearn {
                move_id: 104,
                level: 11
            })
        );
        assert_eq!(pokemon.level, 10);

        let report = resolve_conflict(&mut pokemon, &template(), MoveChoice::Decline, &config)
            .expect("decision should apply");

        assert_eq!(report.declined, vec![104]);
        // 1000 + 2000 experience reaches level 14
        assert_eq!(pokemon.level, 14);
        assert!(pokemon.pending_move.is_none());
    }

    #[test]
    fn resolving_without_a_decision_is_rejected() {
        let config = EngineConfig::default();
        let mut pokemon = pikachu(10);
        let result = resolve_conflict(&mut pokemon, &template(), MoveChoice::Decline, &config);
        assert_eq!(
            result,
            Err(BattleEngineError::InvalidAction(
                ActionError::NoPendingDecision(1)
            ))
        );
    }

    #[test]
    fn bad_forget_slot_changes_nothing() {
        let config = EngineConfig::default();
        let mut pokemon = pikachu(10);
        gain_experience(&mut pokemon, 2000, &template(), &config);
        let before = pokemon.clone();

        let result =
            resolve_conflict(&mut pokemon, &template(), MoveChoice::Forget { slot: 4 }, &config);

        assert_eq!(
            result,
            Err(BattleEngineError::InvalidAction(
                ActionError::InvalidForgetSlot(4)
            ))
        );
        assert_eq!(pokemon, before);
    }

    #[test]
    fn experience_is_capped_at_max_level() {
        let config = EngineConfig {
            max_level: 12,
            ..EngineConfig::default()
        };
        let mut pokemon = pikachu(1);
        pokemon.moves.truncate(1);

        let report = gain_experience(&mut pokemon, 1_000_000, &template(), &config);

        assert_eq!(pokemon.experience, 1728);
        // level 11 fills the last slot, then halts on its second move
        assert_eq!(pokemon.moves, vec![84, 39, 86, 98]);
        assert_eq!(pokemon.level, 10);
        assert_eq!(
            report.pending,
            Some(PendingMoveLearn {
                move_id: 104,
                level: 11
            })
        );
    }
}
