//! In-process document store with optional JSON-file persistence.

use super::{PlayerStore, StoreError};
use crate::models::{Player, PlayerFields, PlayerId};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Players by id. Every mutation checks name uniqueness and writes under one write
/// lock, so two concurrent inserts of the same name cannot both succeed.
///
/// With a backing file, the whole collection is rewritten (temp file + rename)
/// after each mutation; a failed write rolls the in-memory change back.
pub struct DocumentStore {
    players: RwLock<HashMap<PlayerId, Player>>,
    path: Option<PathBuf>,
}

impl DocumentStore {
    /// Store without persistence (tests, throwaway instances).
    pub fn in_memory() -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Load the collection from `path`. A missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let players: HashMap<PlayerId, Player> = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => HashMap::new(),
            Ok(text) => serde_json::from_str::<Vec<Player>>(&text)?
                .into_iter()
                .map(|p| (p.id, p))
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Loaded {} player(s) from {}", players.len(), path.display());
        Ok(Self {
            players: RwLock::new(players),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<PlayerId, Player>>, StoreError> {
        self.players.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<PlayerId, Player>>, StoreError> {
        self.players.write().map_err(|_| StoreError::Poisoned)
    }

    fn flush(&self, players: &HashMap<PlayerId, Player>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let docs = sorted_by_name(players.values().cloned().collect());
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&docs)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn sorted_by_name(mut players: Vec<Player>) -> Vec<Player> {
    players.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    players
}

fn name_taken(players: &HashMap<PlayerId, Player>, name: &str, except: Option<PlayerId>) -> bool {
    players
        .values()
        .any(|p| p.name == name && Some(p.id) != except)
}

impl PlayerStore for DocumentStore {
    fn list(&self) -> Result<Vec<Player>, StoreError> {
        let g = self.read()?;
        Ok(sorted_by_name(g.values().cloned().collect()))
    }

    fn find_many(&self, ids: &[PlayerId]) -> Result<Vec<Player>, StoreError> {
        let g = self.read()?;
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| g.get(id).cloned())
            .collect())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Player>, StoreError> {
        let g = self.read()?;
        Ok(g.values().find(|p| p.name == name).cloned())
    }

    fn search(&self, fragment: &str, limit: usize) -> Result<Vec<Player>, StoreError> {
        let needle = fragment.to_lowercase();
        let g = self.read()?;
        let matches = g
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let mut matches = sorted_by_name(matches);
        matches.truncate(limit);
        Ok(matches)
    }

    fn insert(&self, fields: PlayerFields) -> Result<Player, StoreError> {
        let mut g = self.write()?;
        if name_taken(&g, fields.name(), None) {
            return Err(StoreError::DuplicateName(fields.name().to_string()));
        }
        let player = Player::new(fields);
        g.insert(player.id, player.clone());
        if let Err(e) = self.flush(&g) {
            g.remove(&player.id);
            return Err(e);
        }
        Ok(player)
    }

    fn update(&self, id: PlayerId, fields: PlayerFields) -> Result<Player, StoreError> {
        let mut g = self.write()?;
        if !g.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if name_taken(&g, fields.name(), Some(id)) {
            return Err(StoreError::DuplicateName(fields.name().to_string()));
        }
        let player = g.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let previous = player.clone();
        player.apply(fields);
        let updated = player.clone();
        if let Err(e) = self.flush(&g) {
            g.insert(id, previous);
            return Err(e);
        }
        Ok(updated)
    }

    fn delete(&self, id: PlayerId) -> Result<Player, StoreError> {
        let mut g = self.write()?;
        let removed = g.remove(&id).ok_or(StoreError::NotFound(id))?;
        if let Err(e) = self.flush(&g) {
            g.insert(id, removed);
            return Err(e);
        }
        Ok(removed)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn fields(name: &str, rating: i64) -> PlayerFields {
        PlayerFields::new(name, rating, Position::Midfielder).unwrap()
    }

    /// Store whose data file path is a non-empty directory, so every flush fails.
    fn unwritable_store(dir: &tempfile::TempDir, players: Vec<Player>) -> DocumentStore {
        let path = dir.path().join("players.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();
        DocumentStore {
            players: RwLock::new(players.into_iter().map(|p| (p.id, p)).collect()),
            path: Some(path),
        }
    }

    #[test]
    fn failed_flush_rolls_back_insert() {
        let dir = tempfile::tempdir().unwrap();
        let store = unwritable_store(&dir, Vec::new());
        assert!(matches!(store.insert(fields("Ana", 50)), Err(StoreError::Io(_))));
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn failed_flush_rolls_back_update() {
        let dir = tempfile::tempdir().unwrap();
        let ana = Player::new(fields("Ana", 50));
        let store = unwritable_store(&dir, vec![ana.clone()]);
        assert!(matches!(
            store.update(ana.id, fields("Bo", 90)),
            Err(StoreError::Io(_))
        ));
        assert_eq!(store.list().unwrap(), vec![ana]);
        assert!(store.find_by_name("Bo").unwrap().is_none());
    }

    #[test]
    fn failed_flush_rolls_back_delete() {
        let dir = tempfile::tempdir().unwrap();
        let ana = Player::new(fields("Ana", 50));
        let store = unwritable_store(&dir, vec![ana.clone()]);
        assert!(matches!(store.delete(ana.id), Err(StoreError::Io(_))));
        assert_eq!(store.list().unwrap(), vec![ana]);
    }

    #[test]
    fn find_many_skips_duplicates_and_unknown_ids() {
        let store = DocumentStore::in_memory();
        let a = store.insert(fields("Ana", 50)).unwrap();
        let found = store
            .find_many(&[a.id, a.id, uuid::Uuid::new_v4()])
            .unwrap();
        assert_eq!(found, vec![a]);
    }
}
