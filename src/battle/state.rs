use crate::errors::{invariant, BattleResult, InvariantError};
use crate::pokemon::{Pokemon, PokemonId};
use crate::trainer::{Trainer, TrainerId};
use schema::{Ailment, MoveId, StageStat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleMode {
    Waiting,
    Started,
}

/// Record key shared by both orderings of a participant pair, so at most one
/// battle can exist per pair.
pub fn battle_id(a: TrainerId, b: TrainerId) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    format!("{}:{}", low, high)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    pub id: String,
    /// `[challenger, opponent]`. Side indices everywhere else refer to this order.
    pub participants: [TrainerId; 2],
    pub mode: BattleMode,
    pub turn: u32,
}

impl Battle {
    pub fn new(challenger: TrainerId, opponent: TrainerId) -> Self {
        Self {
            id: battle_id(challenger, opponent),
            participants: [challenger, opponent],
            mode: BattleMode::Waiting,
            turn: 1,
        }
    }

    pub fn side_of(&self, participant: TrainerId) -> Option<usize> {
        self.participants.iter().position(|p| *p == participant)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleAction {
    Move(MoveId),
    Switch(usize),
    Catch,
}

/// Per-combatant turn state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrainerBattleInfo {
    pub finished_turn: bool,
    pub next_action: Option<BattleAction>,
    pub curr_slot: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub sp_attack: i8,
    pub sp_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn get(&self, stat: StageStat) -> i8 {
        match stat {
            StageStat::Attack => self.attack,
            StageStat::Defense => self.defense,
            StageStat::SpAttack => self.sp_attack,
            StageStat::SpDefense => self.sp_defense,
            StageStat::Speed => self.speed,
            StageStat::Accuracy => self.accuracy,
            StageStat::Evasion => self.evasion,
        }
    }

    fn get_mut(&mut self, stat: StageStat) -> &mut i8 {
        match stat {
            StageStat::Attack => &mut self.attack,
            StageStat::Defense => &mut self.defense,
            StageStat::SpAttack => &mut self.sp_attack,
            StageStat::SpDefense => &mut self.sp_defense,
            StageStat::Speed => &mut self.speed,
            StageStat::Accuracy => &mut self.accuracy,
            StageStat::Evasion => &mut self.evasion,
        }
    }

    /// Adds `delta` to a stage and returns the change actually applied.
    pub fn apply(&mut self, stat: StageStat, delta: i8, clamp: bool) -> i8 {
        let current = self.get(stat);
        let target = current as i16 + delta as i16;
        let next = if clamp {
            target.clamp(MIN_STAGE as i16, MAX_STAGE as i16)
        } else {
            target.clamp(i8::MIN as i16, i8::MAX as i16)
        } as i8;
        *self.get_mut(stat) = next;
        next - current
    }
}

/// Per-creature battle state, created lazily at full HP.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PokemonBattleInfo {
    pub curr_hp: u16,
    pub stages: StatStages,
    /// Non-volatile ailment. Confusion never occupies this slot.
    pub ailment: Option<Ailment>,
    pub confused: bool,
}

impl PokemonBattleInfo {
    pub fn fresh(max_hp: u16) -> Self {
        Self {
            curr_hp: max_hp,
            stages: StatStages::default(),
            ailment: None,
            confused: false,
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.curr_hp == 0
    }

    /// Returns the damage actually dealt.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.curr_hp);
        self.curr_hp -= dealt;
        dealt
    }

    /// Returns the HP actually restored.
    pub fn restore_hp(&mut self, amount: u16, max_hp: u16) -> u16 {
        let before = self.curr_hp.min(max_hp);
        self.curr_hp = before.saturating_add(amount).min(max_hp);
        self.curr_hp - before
    }

    /// Whether `ailment` could land right now.
    pub fn can_receive(&self, ailment: Ailment) -> bool {
        match ailment {
            Ailment::Confusion => !self.confused,
            _ => self.ailment.is_none(),
        }
    }

    /// Applies an ailment unless one is already present. Returns whether it landed.
    pub fn inflict(&mut self, ailment: Ailment) -> bool {
        if !self.can_receive(ailment) {
            return false;
        }
        match ailment {
            Ailment::Confusion => self.confused = true,
            other => self.ailment = Some(other),
        }
        true
    }

    /// Drops the state that does not survive being switched out.
    pub fn clear_volatile(&mut self) {
        self.stages = StatStages::default();
        self.confused = false;
    }
}

/// Everything one turn touches, loaded in a single transaction.
/// Index 0 is the challenger, index 1 the opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleSession {
    pub battle: Battle,
    pub trainers: [Trainer; 2],
    pub infos: [TrainerBattleInfo; 2],
    pub pokemon_info: HashMap<PokemonId, PokemonBattleInfo>,
}

impl BattleSession {
    pub fn new(battle: Battle, trainers: [Trainer; 2], infos: [TrainerBattleInfo; 2]) -> Self {
        Self {
            battle,
            trainers,
            infos,
            pokemon_info: HashMap::new(),
        }
    }

    pub fn side_of(&self, participant: TrainerId) -> BattleResult<usize> {
        self.battle.side_of(participant).ok_or_else(|| {
            invariant(InvariantError::ParticipantMismatch {
                battle: self.battle.id.clone(),
                participant,
            })
        })
    }

    pub fn active_slot(&self, side: usize) -> usize {
        self.infos[side].curr_slot
    }

    pub fn active(&self, side: usize) -> BattleResult<&Pokemon> {
        let slot = self.active_slot(side);
        self.trainers[side].party.get(slot).ok_or_else(|| {
            invariant(InvariantError::NoActiveCreature {
                trainer: self.trainers[side].id,
                slot,
            })
        })
    }

    /// Battle state of a creature, or its fresh state if it has not been referenced yet.
    pub fn info_of(&self, pokemon: &Pokemon) -> PokemonBattleInfo {
        self.pokemon_info
            .get(&pokemon.id)
            .copied()
            .unwrap_or_else(|| PokemonBattleInfo::fresh(pokemon.max_hp()))
    }

    pub fn hp_of(&self, pokemon: &Pokemon) -> u16 {
        self.info_of(pokemon).curr_hp
    }

    pub fn active_info(&self, side: usize) -> BattleResult<PokemonBattleInfo> {
        Ok(self.info_of(self.active(side)?))
    }

    /// Mutable battle state for a party slot, created on first reference.
    pub fn info_mut(&mut self, side: usize, slot: usize) -> BattleResult<&mut PokemonBattleInfo> {
        let pokemon = self.trainers[side].party.get(slot).ok_or_else(|| {
            invariant(InvariantError::NoActiveCreature {
                trainer: self.trainers[side].id,
                slot,
            })
        })?;
        let (id, max_hp) = (pokemon.id, pokemon.max_hp());
        Ok(self
            .pokemon_info
            .entry(id)
            .or_insert_with(|| PokemonBattleInfo::fresh(max_hp)))
    }

    pub fn active_info_mut(&mut self, side: usize) -> BattleResult<&mut PokemonBattleInfo> {
        let slot = self.active_slot(side);
        self.info_mut(side, slot)
    }

    pub fn first_healthy_slot(&self, side: usize) -> Option<usize> {
        self.trainers[side]
            .party
            .iter()
            .position(|p| self.hp_of(p) > 0)
    }

    /// A side has lost once no creature in its party has HP left.
    pub fn party_wiped(&self, side: usize) -> bool {
        self.first_healthy_slot(side).is_none()
    }

    pub fn all_pokemon_ids(&self) -> Vec<PokemonId> {
        self.trainers
            .iter()
            .flat_map(|t| t.party.iter().map(|p| p.id))
            .collect()
    }
}
