use crate::errors::{BattleEngineError, BattleResult};
use serde::{Deserialize, Serialize};

/// How two moves with equal priority and equal effective Speed are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedTieRule {
    /// The participant with the lower trainer id acts first.
    #[default]
    LowerParticipantId,
    /// The participant whose request completed the turn acts first.
    Initiator,
}

/// Tunable rules of the engine. Every field has a default, so a RON file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub party_size_limit: usize,
    pub move_slots: usize,
    pub max_level: u8,
    /// Keep stat stages inside [-6, 6] when applying changes. When off the
    /// counters run on, but multipliers still read them as at most ±6.
    pub clamp_stat_stages: bool,
    pub speed_tie: SpeedTieRule,
    /// One-in-N critical hit odds, indexed by a move's crit tier.
    pub crit_denominators: Vec<u32>,
    pub confusion_self_hit_chance: u8,
    /// Poison and burn deal 1/8 max HP at the end of each turn.
    pub residual_damage: bool,
    pub trainer_exp_bonus: f64,
    pub wild_level_spread: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            party_size_limit: 6,
            move_slots: 4,
            max_level: 100,
            clamp_stat_stages: true,
            speed_tie: SpeedTieRule::LowerParticipantId,
            crit_denominators: vec![24, 8, 2, 1],
            confusion_self_hit_chance: 33,
            residual_damage: true,
            trainer_exp_bonus: 1.5,
            wild_level_spread: 2,
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(text: &str) -> BattleResult<Self> {
        let config: EngineConfig =
            ron::from_str(text).map_err(|e| BattleEngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> BattleResult<()> {
        if self.party_size_limit == 0 {
            return Err(BattleEngineError::Config(
                "party_size_limit must be at least 1".to_string(),
            ));
        }
        if self.move_slots == 0 {
            return Err(BattleEngineError::Config(
                "move_slots must be at least 1".to_string(),
            ));
        }
        if self.max_level == 0 {
            return Err(BattleEngineError::Config(
                "max_level must be at least 1".to_string(),
            ));
        }
        if self.crit_denominators.is_empty() || self.crit_denominators.contains(&0) {
            return Err(BattleEngineError::Config(
                "crit_denominators must be non-empty and non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Odds denominator for a crit tier; tiers past the table use its last entry.
    pub fn crit_denominator(&self, tier: u8) -> u32 {
        let index = (tier as usize).min(self.crit_denominators.len().saturating_sub(1));
        self.crit_denominators.get(index).copied().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = EngineConfig::from_ron_str("(speed_tie: Initiator, party_size_limit: 3)")
            .expect("config should parse");

        assert_eq!(config.speed_tie, SpeedTieRule::Initiator);
        assert_eq!(config.party_size_limit, 3);
        assert_eq!(config.move_slots, 4);
        assert_eq!(config.crit_denominators, vec![24, 8, 2, 1]);
    }

    #[test]
    fn malformed_ron_is_a_config_error() {
        let result = EngineConfig::from_ron_str("(party_size_limit: \"six\")");
        assert!(matches!(result, Err(BattleEngineError::Config(_))));
    }

    #[test]
    fn zero_crit_denominator_is_rejected() {
        let result = EngineConfig::from_ron_str("(crit_denominators: [24, 0])");
        assert!(matches!(result, Err(BattleEngineError::Config(_))));
    }

    #[test]
    fn crit_tiers_past_table_use_last_entry() {
        let config = EngineConfig::default();
        assert_eq!(config.crit_denominator(0), 24);
        assert_eq!(config.crit_denominator(2), 2);
        assert_eq!(config.crit_denominator(9), 1);
    }
}
