use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StorageError;
use crate::model::Face;

pub const STORAGE_KEY: &str = "dice-game-rolls";
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RollHistoryEntry {
    pub value: Face,
    pub player_name: Option<String>,
    pub timestamp: u64,
    pub game_mode: String,
}

/// String key-value storage in the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every operation, like storage disabled by the host.
    pub fn unavailable() -> Self {
        Self { items: HashMap::new(), unavailable: true }
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable { Err(StorageError::Unavailable) } else { Ok(()) }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.items.remove(key);
        Ok(())
    }
}

/// One file per key under a directory, so the log survives restarts.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

pub struct RollHistory<S> {
    store: S,
    key: String,
    capacity: usize,
}

impl<S: KeyValueStore> RollHistory<S> {
    pub fn new(store: S) -> Self {
        Self::with_capacity(store, STORAGE_KEY, DEFAULT_CAPACITY)
    }

    /// A zero capacity is raised to one.
    pub fn with_capacity(store: S, key: impl Into<String>, capacity: usize) -> Self {
        let key = key.into();
        if capacity == 0 {
            warn!(key = %key, "Roll history capacity of 0, keeping the latest roll only");
        }
        Self { store, key, capacity: capacity.max(1) }
    }

    fn load(&self) -> Result<Vec<RollHistoryEntry>, StorageError> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(vec![]),
        }
    }

    /// Entries newest first.
    pub fn list(&self) -> Vec<RollHistoryEntry> {
        self.load().unwrap_or_else(|err| {
            warn!(key = %self.key, %err, "Failed to load roll history");
            vec![]
        })
    }

    pub fn append(&mut self, entry: RollHistoryEntry) {
        let mut entries = self.list();
        entries.insert(0, entry);
        entries.truncate(self.capacity);
        let result = serde_json::to_string(&entries)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set(&self.key, &raw));
        if let Err(err) = result {
            warn!(key = %self.key, %err, "Failed to save roll");
        }
    }

    pub fn clear(&mut self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!(key = %self.key, %err, "Failed to clear roll history");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: Face, timestamp: u64) -> RollHistoryEntry {
        RollHistoryEntry { value, player_name: None, timestamp, game_mode: "normal".into() }
    }

    #[test]
    fn keeps_newest_ten() {
        let mut h = RollHistory::new(MemoryStore::new());
        for i in 0..15u64 {
            h.append(entry((i % 6) as Face + 1, i));
        }
        let list = h.list();
        assert_eq!(list.len(), 10);
        let stamps: Vec<_> = list.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, (5..15).rev().collect::<Vec<_>>());
    }

    #[test]
    fn corrupt_log_reads_empty_and_recovers() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        let mut h = RollHistory::new(store);
        assert!(h.list().is_empty());
        h.append(entry(3, 1));
        assert_eq!(h.list(), vec![entry(3, 1)]);
    }

    #[test]
    fn unavailable_store_degrades() {
        let mut h = RollHistory::new(MemoryStore::unavailable());
        h.append(entry(1, 1));
        assert!(h.list().is_empty());
        h.clear();
    }

    #[test]
    fn wire_format_is_camel_case() {
        let mut h = RollHistory::new(MemoryStore::new());
        h.append(RollHistoryEntry { value: 6, player_name: Some("Ana".into()), timestamp: 42, game_mode: "battle".into() });
        let raw = h.store().get(STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["playerName"], "Ana");
        assert_eq!(json[0]["gameMode"], "battle");
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let mut h = RollHistory::with_capacity(MemoryStore::new(), STORAGE_KEY, 0);
        h.append(entry(1, 1));
        h.append(entry(2, 2));
        assert_eq!(h.list(), vec![entry(2, 2)]);
    }

    #[test]
    fn clear_empties_log() {
        let mut h = RollHistory::new(MemoryStore::new());
        h.append(entry(2, 1));
        h.clear();
        assert!(h.list().is_empty());
    }
}
