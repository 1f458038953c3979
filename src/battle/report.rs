//! Structured results of a turn. These are the payloads handed to the
//! messenger; rendering them as text is someone else's job.

use crate::pokemon::PokemonId;
use crate::progression::leveling::LevelingReport;
use crate::trainer::TrainerId;
use schema::{Ailment, MoveId, StageStat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitReport {
    pub damage: u16,
    pub critical: bool,
    pub effectiveness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChangeReport {
    pub pokemon: PokemonId,
    pub stat: StageStat,
    /// Change actually applied after clamping; 0 means it had no effect.
    pub delta: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveReport {
    pub side: usize,
    pub attacker: PokemonId,
    pub defender: PokemonId,
    pub move_id: MoveId,
    /// Damage the user dealt to itself in confusion instead of moving.
    pub confusion_damage: Option<u16>,
    pub missed: bool,
    pub immune: bool,
    pub hits: Vec<HitReport>,
    pub ailment: Option<Ailment>,
    pub flinched: bool,
    pub stage_changes: Vec<StageChangeReport>,
    pub drained: u16,
    pub recoil: u16,
    pub healed: u16,
    pub attacker_hp_delta: i32,
    pub defender_hp_delta: i32,
    pub attacker_fainted: bool,
    pub defender_fainted: bool,
}

impl MoveReport {
    pub fn new(side: usize, attacker: PokemonId, defender: PokemonId, move_id: MoveId) -> Self {
        Self {
            side,
            attacker,
            defender,
            move_id,
            confusion_damage: None,
            missed: false,
            immune: false,
            hits: Vec::new(),
            ailment: None,
            flinched: false,
            stage_changes: Vec::new(),
            drained: 0,
            recoil: 0,
            healed: 0,
            attacker_hp_delta: 0,
            defender_hp_delta: 0,
            attacker_fainted: false,
            defender_fainted: false,
        }
    }

    pub fn total_damage(&self) -> u32 {
        self.hits.iter().map(|h| h.damage as u32).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchResult {
    Caught,
    Escaped { roll: u32 },
    /// The catcher's party is at the size ceiling; no roll was made.
    PartyFull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchReport {
    pub side: usize,
    pub target: PokemonId,
    pub score: f64,
    pub result: CatchResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionReport {
    Move(MoveReport),
    Switch {
        side: usize,
        from_slot: usize,
        to_slot: usize,
    },
    Catch(CatchReport),
    /// The acting creature had no HP when its turn came.
    FaintedCannotAct { side: usize, pokemon: PokemonId },
    /// The acting creature flinched from the first action of the turn.
    Flinched { side: usize, pokemon: PokemonId },
    /// The first action of the turn knocked out this side's creature.
    Skipped { side: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualReport {
    pub side: usize,
    pub pokemon: PokemonId,
    pub ailment: Ailment,
    pub damage: u16,
    pub fainted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Winner { winner: TrainerId, loser: TrainerId },
    Draw,
    Captured { catcher: TrainerId, pokemon: PokemonId },
    Forfeit { winner: TrainerId, loser: TrainerId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub battle_id: String,
    pub turn: u32,
    /// Side indices in execution order.
    pub order: [usize; 2],
    pub actions: Vec<ActionReport>,
    pub residual: Vec<ResidualReport>,
    pub leveling: Vec<LevelingReport>,
    pub outcome: Option<BattleOutcome>,
}

impl TurnReport {
    pub fn new(battle_id: impl Into<String>, turn: u32, order: [usize; 2]) -> Self {
        Self {
            battle_id: battle_id.into(),
            turn,
            order,
            actions: Vec::new(),
            residual: Vec::new(),
            leveling: Vec::new(),
            outcome: None,
        }
    }

    pub fn move_reports(&self) -> impl Iterator<Item = &MoveReport> {
        self.actions.iter().filter_map(|a| match a {
            ActionReport::Move(report) => Some(report),
            _ => None,
        })
    }
}
