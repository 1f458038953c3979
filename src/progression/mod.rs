pub mod growth;
pub mod leveling;
pub mod rewards;

pub use growth::experience_for_level;
pub use leveling::{gain_experience, resolve_conflict, LearnedMove, LevelingReport, MoveChoice};
pub use rewards::experience_for_defeat;
