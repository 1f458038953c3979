use crate::pokemon::{Pokemon, PokemonId};
use serde::{Deserialize, Serialize};

pub type TrainerId = u64;

/// Who decides a combatant's actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    Human,
    Wild,
    GymLeader,
}

impl CombatantKind {
    /// AI combatants never wait for input; the action queue fills their turns.
    pub fn is_ai(self) -> bool {
        !matches!(self, CombatantKind::Human)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: TrainerId,
    pub name: String,
    pub kind: CombatantKind,
    pub party: Vec<Pokemon>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Progress counter gating wild encounter tiers.
    pub badges: u8,
    pub battling: bool,
}

impl Trainer {
    pub fn new(id: TrainerId, name: impl Into<String>, kind: CombatantKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            party: Vec::new(),
            wins: 0,
            losses: 0,
            draws: 0,
            badges: 0,
            battling: false,
        }
    }

    pub fn with_party(mut self, party: Vec<Pokemon>) -> Self {
        self.party = party;
        self
    }

    pub fn pokemon(&self, id: PokemonId) -> Option<&Pokemon> {
        self.party.iter().find(|p| p.id == id)
    }

    pub fn pokemon_mut(&mut self, id: PokemonId) -> Option<&mut Pokemon> {
        self.party.iter_mut().find(|p| p.id == id)
    }
}
