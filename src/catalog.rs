//! Read-only access to move and creature data.
//!
//! The engine never mutates catalog entries. Lookups fail closed: a missing
//! id is an error, never a default.

use crate::errors::{BattleEngineError, BattleResult, CatalogError};
use schema::{CreatureTemplate, MoveData, MoveId, SpeciesId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

pub trait Catalog {
    fn fetch_move(&self, id: MoveId) -> Result<MoveData, CatalogError>;
    fn fetch_creature(&self, id: SpeciesId) -> Result<CreatureTemplate, CatalogError>;
}

/// On-disk shape of a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub moves: Vec<MoveData>,
    #[serde(default)]
    pub creatures: Vec<CreatureTemplate>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    moves: HashMap<MoveId, MoveData>,
    creatures: HashMap<SpeciesId, CreatureTemplate>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: CatalogData) -> Self {
        let mut catalog = Self::new();
        for move_data in data.moves {
            catalog.insert_move(move_data);
        }
        for creature in data.creatures {
            catalog.insert_creature(creature);
        }
        catalog
    }

    pub fn from_ron_str(text: &str) -> BattleResult<Self> {
        let data: CatalogData = ron::from_str(text)
            .map_err(|e| BattleEngineError::Catalog(CatalogError::Malformed(e.to_string())))?;
        Ok(Self::from_data(data))
    }

    pub fn insert_move(&mut self, move_data: MoveData) {
        self.moves.insert(move_data.id, move_data);
    }

    pub fn insert_creature(&mut self, creature: CreatureTemplate) {
        self.creatures.insert(creature.id, creature);
    }
}

impl Catalog for InMemoryCatalog {
    fn fetch_move(&self, id: MoveId) -> Result<MoveData, CatalogError> {
        self.moves
            .get(&id)
            .cloned()
            .ok_or(CatalogError::MoveNotFound(id))
    }

    fn fetch_creature(&self, id: SpeciesId) -> Result<CreatureTemplate, CatalogError> {
        self.creatures
            .get(&id)
            .cloned()
            .ok_or(CatalogError::CreatureNotFound(id))
    }
}

/// Memoizes successful lookups of a slower catalog. Failures are not cached.
#[derive(Debug)]
pub struct CachedCatalog<C> {
    inner: C,
    moves: RwLock<HashMap<MoveId, MoveData>>,
    creatures: RwLock<HashMap<SpeciesId, CreatureTemplate>>,
}

impl<C: Catalog> CachedCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            moves: RwLock::new(HashMap::new()),
            creatures: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Catalog> Catalog for CachedCatalog<C> {
    fn fetch_move(&self, id: MoveId) -> Result<MoveData, CatalogError> {
        if let Some(hit) = self.moves.read().ok().and_then(|m| m.get(&id).cloned()) {
            return Ok(hit);
        }
        let fetched = self.inner.fetch_move(id)?;
        if let Ok(mut cache) = self.moves.write() {
            cache.insert(id, fetched.clone());
        }
        Ok(fetched)
    }

    fn fetch_creature(&self, id: SpeciesId) -> Result<CreatureTemplate, CatalogError> {
        if let Some(hit) = self.creatures.read().ok().and_then(|m| m.get(&id).cloned()) {
            return Ok(hit);
        }
        let fetched = self.inner.fetch_creature(id)?;
        if let Ok(mut cache) = self.creatures.write() {
            cache.insert(id, fetched.clone());
        }
        Ok(fetched)
    }
}
