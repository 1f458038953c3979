//! Notifications to battle participants.
//!
//! The service hands every notification to a [`Messenger`] only after the
//! state change that produced it has been committed.

use crate::battle::report::{BattleOutcome, TurnReport};
use crate::progression::LevelingReport;
use crate::trainer::TrainerId;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    ChallengeIssued {
        battle_id: String,
        challenger: TrainerId,
        opponent: TrainerId,
    },
    ChallengeWithdrawn {
        battle_id: String,
        by: TrainerId,
    },
    BattleStarted {
        battle_id: String,
        participants: [TrainerId; 2],
    },
    /// One side queued its action; the other side is still choosing.
    ActionQueued {
        battle_id: String,
        participant: TrainerId,
    },
    TurnResolved(TurnReport),
    BattleEnded {
        battle_id: String,
        outcome: BattleOutcome,
    },
    Leveling {
        trainer: TrainerId,
        report: LevelingReport,
    },
}

pub trait Messenger {
    fn deliver(&self, notification: &Notification);
}

/// Writes each notification to the log as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMessenger;

impl Messenger for LogMessenger {
    fn deliver(&self, notification: &Notification) {
        match serde_json::to_string(notification) {
            Ok(json) => log::info!("notify: {}", json),
            Err(e) => log::warn!("could not serialize notification: {}", e),
        }
    }
}

/// Keeps notifications in memory so callers and tests can inspect them.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains everything delivered so far.
    pub fn take(&self) -> Vec<Notification> {
        match self.delivered.lock() {
            Ok(mut delivered) => std::mem::take(&mut *delivered),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Messenger for RecordingMessenger {
    fn deliver(&self, notification: &Notification) {
        match self.delivered.lock() {
            Ok(mut delivered) => delivered.push(notification.clone()),
            Err(poisoned) => poisoned.into_inner().push(notification.clone()),
        }
    }
}
