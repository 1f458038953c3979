use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageClass {
    Status,
    Physical,
    Special,
}

impl fmt::Display for DamageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageClass::Status => write!(f, "Status"),
            DamageClass::Physical => write!(f, "Physical"),
            DamageClass::Special => write!(f, "Special"),
        }
    }
}

/// Out-of-battle stats, in the order they are stored in IV/EV arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
}

impl Stat {
    pub fn index(self) -> usize {
        match self {
            Stat::Hp => 0,
            Stat::Attack => 1,
            Stat::Defense => 2,
            Stat::SpAttack => 3,
            Stat::SpDefense => 4,
            Stat::Speed => 5,
        }
    }
}

/// Stats that carry an in-battle stage counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum StageStat {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl fmt::Display for StageStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStat::Attack => write!(f, "Attack"),
            StageStat::Defense => write!(f, "Defense"),
            StageStat::SpAttack => write!(f, "Special Attack"),
            StageStat::SpDefense => write!(f, "Special Defense"),
            StageStat::Speed => write!(f, "Speed"),
            StageStat::Accuracy => write!(f, "Accuracy"),
            StageStat::Evasion => write!(f, "Evasion"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTarget {
    User,
    Opponent,
}

/// Persistent status conditions. Confusion is tracked as a separate flag in
/// battle and therefore never occupies the single ailment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ailment {
    Paralysis,
    Sleep,
    Freeze,
    Burn,
    Poison,
    Confusion,
}

impl Ailment {
    /// Capture score multiplier for a creature carrying this ailment.
    pub fn catch_bonus(self) -> f64 {
        match self {
            Ailment::Sleep | Ailment::Freeze => 2.0,
            Ailment::Paralysis | Ailment::Poison | Ailment::Burn => 1.5,
            Ailment::Confusion => 1.0,
        }
    }
}

impl fmt::Display for Ailment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ailment::Paralysis => "paralysis",
            Ailment::Sleep => "sleep",
            Ailment::Freeze => "freeze",
            Ailment::Burn => "burn",
            Ailment::Poison => "poison",
            Ailment::Confusion => "confusion",
        };
        write!(f, "{}", name)
    }
}
