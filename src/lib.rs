//! Pokemon Battle Engine
//!
//! Turn resolution for two-sided creature battles: action queueing, turn
//! ordering, move execution, catching, fainting and leveling. Storage,
//! creature data and message delivery are reached through traits so the
//! engine can run against in-memory adapters or real services.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod messaging;
pub mod pokemon;
pub mod progression;
pub mod rng;
pub mod service;
pub mod storage;
pub mod trainer;
pub mod type_chart;
pub mod wild;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    Ailment, BaseStats, CreatureTemplate, DamageClass, GrowthRate, LevelMove, MoveData, MoveId,
    MoveTarget, PokemonType, SpeciesId, StageStat, Stat, StatChange, TypeEntry, TypeMod,
};

// --- From this crate's modules (`src/`) ---

// Battle state and turn resolution.
pub use battle::engine::EngineContext;
pub use battle::report::{ActionReport, BattleOutcome, CatchResult, MoveReport, TurnReport};
pub use battle::state::{
    Battle, BattleAction, BattleMode, BattleSession, PokemonBattleInfo, TrainerBattleInfo,
};
pub use battle::turn_orchestrator::resolve_turn;

// Combatants and their creatures.
pub use pokemon::{Pokemon, PokemonId};
pub use trainer::{CombatantKind, Trainer, TrainerId};

// Collaborators.
pub use catalog::{CachedCatalog, Catalog, InMemoryCatalog};
pub use messaging::{LogMessenger, Messenger, Notification, RecordingMessenger};
pub use rng::{BattleRng, SeededRng, ThreadBattleRng};
pub use storage::{InMemoryStore, RecordStore, Transaction, Version, VersionedRecord};

pub use config::{EngineConfig, SpeedTieRule};
pub use progression::{LevelingReport, MoveChoice};
pub use service::{BattleService, SubmitOutcome};
pub use type_chart::TypeChart;
pub use wild::WildTables;

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, CatalogError, InvariantError,
    PreconditionError, StorageError,
};
