use crate::pokemon::PokemonId;
use crate::trainer::TrainerId;
use schema::{MoveId, SpeciesId};
use thiserror::Error;

/// Main error type for the battle engine.
///
/// Rejections (`InvalidAction`, `Precondition`) leave state untouched and carry
/// a terse message meant for the player. Everything else is fatal for the
/// request: the transaction is dropped and the caller sees a generic message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleEngineError {
    #[error(transparent)]
    InvalidAction(#[from] ActionError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("catalog failure: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantError),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Malformed or out-of-range player input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("no creature in slot {0}")]
    NoCreatureInSlot(usize),
    #[error("move {0} does not exist")]
    UnknownMove(MoveId),
    #[error("your creature does not know move {0}")]
    MoveNotKnown(MoveId),
    #[error("trainer {0} does not exist")]
    UnknownTrainer(TrainerId),
    #[error("creature {0} is not in your party")]
    UnknownPokemon(PokemonId),
    #[error("creature {0} has no pending move decision")]
    NoPendingDecision(PokemonId),
    #[error("no move in slot {0} to forget")]
    InvalidForgetSlot(usize),
    #[error("region {0} does not exist")]
    UnknownRegion(String),
    #[error("no encounters available in {0} yet")]
    NoEncounters(String),
}

/// A well-formed request that the current battle state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("your creature has fainted and cannot act")]
    FaintedCannotAct,
    #[error("creature in slot {0} is already in battle")]
    SwitchToActive(usize),
    #[error("creature in slot {0} has fainted")]
    SwitchToFainted(usize),
    #[error("you can only catch wild creatures")]
    CatchNonWild,
    #[error("trainer {0} is already in a battle")]
    AlreadyInBattle(TrainerId),
    #[error("trainer {0} is not in a battle")]
    NotInBattle(TrainerId),
    #[error("the battle has not started yet")]
    BattleNotStarted,
    #[error("the battle has already started")]
    BattleAlreadyStarted,
    #[error("only the challenged trainer can accept")]
    NotChallenged,
    #[error("you cannot challenge yourself")]
    SelfChallenge,
    #[error("trainer {0} has no creature able to fight")]
    NoHealthyCreature(TrainerId),
}

/// Failures reported by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("record {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("record {key} could not be encoded: {reason}")]
    Encode { key: String, reason: String },
    #[error("record {key} changed during the request")]
    Conflict { key: String },
}

/// Failures reported by the creature/move data provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("move {0} not found")]
    MoveNotFound(MoveId),
    #[error("creature {0} not found")]
    CreatureNotFound(SpeciesId),
    #[error("malformed catalog data: {0}")]
    Malformed(String),
}

/// States that cannot arise if every request ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("trainer {0} is marked as battling but has no battle")]
    BattlingWithoutBattle(TrainerId),
    #[error("battle {battle} does not name participant {participant}")]
    ParticipantMismatch { battle: String, participant: TrainerId },
    #[error("battle index for {participant} points at missing battle {battle}")]
    DanglingBattleIndex { battle: String, participant: TrainerId },
    #[error("battle {battle} has no turn state for participant {participant}")]
    MissingBattleInfo { battle: String, participant: TrainerId },
    #[error("trainer {trainer} has no creature in active slot {slot}")]
    NoActiveCreature { trainer: TrainerId, slot: usize },
    #[error("creature {0} knows no moves")]
    EmptyMoveset(PokemonId),
    #[error("turn resolution requested for {0} before both actions were queued")]
    TurnNotReady(String),
}

impl BattleEngineError {
    /// True for errors that are the player's fault and change nothing.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BattleEngineError::InvalidAction(_) | BattleEngineError::Precondition(_)
        )
    }

    /// Text safe to show to the player.
    pub fn user_message(&self) -> String {
        if self.is_rejection() {
            self.to_string()
        } else {
            "Something went wrong. Please try again later.".to_string()
        }
    }
}

/// Result type for operations that can fail in the battle engine
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Logs an invariant violation at error level and wraps it.
pub(crate) fn invariant(err: InvariantError) -> BattleEngineError {
    log::error!("{}", err);
    BattleEngineError::Invariant(err)
}
