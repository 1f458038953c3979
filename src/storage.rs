//! Record storage.
//!
//! The engine needs only a key/value store of byte records with an
//! all-or-nothing batch commit. A [`Transaction`] buffers every write of a
//! request and reads its own writes; dropping it without committing persists
//! nothing. Every record carries a version, and a commit is refused if any
//! record the transaction read has changed since. Records are encoded with
//! postcard.

use crate::battle::state::{
    Battle, BattleMode, BattleSession, PokemonBattleInfo, TrainerBattleInfo,
};
use crate::errors::{
    invariant, ActionError, BattleResult, InvariantError, PreconditionError, StorageError,
};
use crate::pokemon::PokemonId;
use crate::trainer::{Trainer, TrainerId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Bumped on every write or delete of a key. A key never written is at 0.
pub type Version = u64;

/// A write in a batch: `Some` stores the bytes, `None` deletes the key.
pub type RecordWrite = (String, Option<Vec<u8>>);

/// A record as read, together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionedRecord {
    pub version: Version,
    pub bytes: Option<Vec<u8>>,
}

pub trait RecordStore {
    fn read(&self, key: &str) -> Result<VersionedRecord, StorageError>;
    /// Applies every write or none of them. Fails with
    /// [`StorageError::Conflict`] if any key in `expected` is no longer at
    /// the given version.
    fn commit(
        &self,
        expected: Vec<(String, Version)>,
        writes: Vec<RecordWrite>,
    ) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct Records {
    values: HashMap<String, Vec<u8>>,
    // Kept for deleted keys too, so a delete and re-create is still a change.
    versions: HashMap<String, Version>,
}

impl Records {
    fn version(&self, key: &str) -> Version {
        self.versions.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Records>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read and commit fail, to exercise abandoned requests.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .records
            .lock()
            .map(|r| r.values.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("store is offline".to_string()));
        }
        self.records
            .lock()
            .map_err(|_| StorageError::Unavailable("record lock poisoned".to_string()))
    }
}

impl RecordStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<VersionedRecord, StorageError> {
        let records = self.lock()?;
        Ok(VersionedRecord {
            version: records.version(key),
            bytes: records.values.get(key).cloned(),
        })
    }

    fn commit(
        &self,
        expected: Vec<(String, Version)>,
        writes: Vec<RecordWrite>,
    ) -> Result<(), StorageError> {
        let mut records = self.lock()?;
        if let Some((key, _)) = expected
            .into_iter()
            .find(|(key, version)| records.version(key) != *version)
        {
            return Err(StorageError::Conflict { key });
        }
        for (key, value) in writes {
            let next = records.version(&key) + 1;
            records.versions.insert(key.clone(), next);
            match value {
                Some(bytes) => records.values.insert(key, bytes),
                None => records.values.remove(&key),
            };
        }
        Ok(())
    }
}

fn battle_key(battle_id: &str) -> String {
    format!("battle/{}", battle_id)
}

fn active_battle_key(participant: TrainerId) -> String {
    format!("active-battle/{}", participant)
}

fn trainer_battle_key(battle_id: &str, participant: TrainerId) -> String {
    format!("trainer-battle/{}/{}", battle_id, participant)
}

fn pokemon_battle_key(battle_id: &str, pokemon: PokemonId) -> String {
    format!("pokemon-battle/{}/{}", battle_id, pokemon)
}

fn trainer_key(id: TrainerId) -> String {
    format!("trainer/{}", id)
}

const POKEMON_SEQUENCE: &str = "seq/pokemon";
const TRAINER_SEQUENCE: &str = "seq/trainer";

/// One request's view of the store.
pub struct Transaction<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    // First version seen for every key read from the store.
    reads: RefCell<BTreeMap<String, Version>>,
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl<'a, S: RecordStore + ?Sized> Transaction<'a, S> {
    pub fn begin(store: &'a S) -> Self {
        Self {
            store,
            reads: RefCell::new(BTreeMap::new()),
            writes: BTreeMap::new(),
        }
    }

    pub fn commit(self) -> Result<(), StorageError> {
        log::debug!("committing {} writes", self.writes.len());
        let expected = self.reads.into_inner().into_iter().collect();
        let result = self
            .store
            .commit(expected, self.writes.into_iter().collect());
        if let Err(StorageError::Conflict { key }) = &result {
            log::warn!("commit refused, {} changed concurrently", key);
        }
        result
    }

    fn read_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if let Some(pending) = self.writes.get(key) {
            return Ok(pending.clone());
        }
        let record = self.store.read(key)?;
        self.reads
            .borrow_mut()
            .entry(key.to_string())
            .or_insert(record.version);
        Ok(record.bytes)
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.read_raw(key)? {
            None => Ok(None),
            Some(bytes) => postcard::from_bytes(&bytes).map(Some).map_err(|e| {
                StorageError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }

    fn put<T: Serialize>(&mut self, key: String, value: &T) -> Result<(), StorageError> {
        let bytes = postcard::to_allocvec(value).map_err(|e| StorageError::Encode {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.writes.insert(key, Some(bytes));
        Ok(())
    }

    fn delete(&mut self, key: String) {
        self.writes.insert(key, None);
    }

    fn next_in_sequence(&mut self, key: &str) -> BattleResult<u64> {
        let next = self.get::<u64>(key)?.unwrap_or(0) + 1;
        self.put(key.to_string(), &next)?;
        Ok(next)
    }

    // --- Battles ---

    /// The battle `participant` is in, if any.
    pub fn load_battle(&self, participant: TrainerId) -> BattleResult<Option<Battle>> {
        let Some(battle_id) = self.get::<String>(&active_battle_key(participant))? else {
            return Ok(None);
        };
        let battle = self.get::<Battle>(&battle_key(&battle_id))?.ok_or_else(|| {
            invariant(InvariantError::DanglingBattleIndex {
                battle: battle_id.clone(),
                participant,
            })
        })?;
        if battle.side_of(participant).is_none() {
            return Err(invariant(InvariantError::ParticipantMismatch {
                battle: battle.id,
                participant,
            }));
        }
        Ok(Some(battle))
    }

    /// Saves the battle and indexes it under both participants.
    pub fn save_battle(&mut self, battle: &Battle) -> BattleResult<()> {
        self.put(battle_key(&battle.id), battle)?;
        for participant in battle.participants {
            self.put(active_battle_key(participant), &battle.id)?;
        }
        Ok(())
    }

    /// Deletes the battle, its indexes and every child record.
    pub fn delete_battle(&mut self, battle: &Battle, pokemon: &[PokemonId]) {
        self.delete(battle_key(&battle.id));
        for participant in battle.participants {
            self.delete(active_battle_key(participant));
            self.delete(trainer_battle_key(&battle.id, participant));
        }
        for id in pokemon {
            self.delete(pokemon_battle_key(&battle.id, *id));
        }
    }

    pub fn load_trainer_battle_info(
        &self,
        battle_id: &str,
        participant: TrainerId,
    ) -> BattleResult<Option<TrainerBattleInfo>> {
        Ok(self.get(&trainer_battle_key(battle_id, participant))?)
    }

    pub fn save_trainer_battle_info(
        &mut self,
        battle_id: &str,
        participant: TrainerId,
        info: &TrainerBattleInfo,
    ) -> BattleResult<()> {
        Ok(self.put(trainer_battle_key(battle_id, participant), info)?)
    }

    pub fn load_pokemon_battle_info(
        &self,
        battle_id: &str,
        pokemon: PokemonId,
    ) -> BattleResult<Option<PokemonBattleInfo>> {
        Ok(self.get(&pokemon_battle_key(battle_id, pokemon))?)
    }

    pub fn save_pokemon_battle_info(
        &mut self,
        battle_id: &str,
        pokemon: PokemonId,
        info: &PokemonBattleInfo,
    ) -> BattleResult<()> {
        Ok(self.put(pokemon_battle_key(battle_id, pokemon), info)?)
    }

    // --- Trainers ---

    pub fn find_trainer(&self, id: TrainerId) -> BattleResult<Option<Trainer>> {
        Ok(self.get(&trainer_key(id))?)
    }

    pub fn load_trainer(&self, id: TrainerId) -> BattleResult<Trainer> {
        self.find_trainer(id)?
            .ok_or_else(|| ActionError::UnknownTrainer(id).into())
    }

    pub fn save_trainer(&mut self, trainer: &Trainer) -> BattleResult<()> {
        Ok(self.put(trainer_key(trainer.id), trainer)?)
    }

    pub fn delete_trainer(&mut self, id: TrainerId) {
        self.delete(trainer_key(id));
    }

    pub fn next_pokemon_id(&mut self) -> BattleResult<PokemonId> {
        self.next_in_sequence(POKEMON_SEQUENCE)
    }

    pub fn next_trainer_id(&mut self) -> BattleResult<TrainerId> {
        self.next_in_sequence(TRAINER_SEQUENCE)
    }

    // --- Sessions ---

    /// Loads everything a started battle of `participant` needs for a turn.
    pub fn load_session(&self, participant: TrainerId) -> BattleResult<BattleSession> {
        let trainer = self.load_trainer(participant)?;
        let Some(battle) = self.load_battle(participant)? else {
            if trainer.battling {
                return Err(invariant(InvariantError::BattlingWithoutBattle(participant)));
            }
            return Err(PreconditionError::NotInBattle(participant).into());
        };
        if battle.mode != BattleMode::Started {
            return Err(PreconditionError::BattleNotStarted.into());
        }

        let trainers = [
            self.load_trainer(battle.participants[0])?,
            self.load_trainer(battle.participants[1])?,
        ];
        let mut infos = [TrainerBattleInfo::default(); 2];
        for (side, participant) in battle.participants.iter().enumerate() {
            infos[side] = self
                .load_trainer_battle_info(&battle.id, *participant)?
                .ok_or_else(|| {
                    invariant(InvariantError::MissingBattleInfo {
                        battle: battle.id.clone(),
                        participant: *participant,
                    })
                })?;
        }

        let mut session = BattleSession::new(battle, trainers, infos);
        for id in session.all_pokemon_ids() {
            if let Some(info) = self.load_pokemon_battle_info(&session.battle.id, id)? {
                session.pokemon_info.insert(id, info);
            }
        }
        Ok(session)
    }

    /// Writes back a session whose battle is still running.
    pub fn save_session(&mut self, session: &BattleSession) -> BattleResult<()> {
        self.save_battle(&session.battle)?;
        for side in 0..2 {
            self.save_trainer(&session.trainers[side])?;
            self.save_trainer_battle_info(
                &session.battle.id,
                session.battle.participants[side],
                &session.infos[side],
            )?;
        }
        for (id, info) in &session.pokemon_info {
            self.save_pokemon_battle_info(&session.battle.id, *id, info)?;
        }
        Ok(())
    }
}
