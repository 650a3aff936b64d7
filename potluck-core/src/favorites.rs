//! Client-local favorite recipes, kept as a JSON array of ids under one key
//! of a [`KeyValueStore`].

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

pub const FAVORITES_KEY: &str = "favoriteRecipes";

#[derive(Error, Debug)]
pub enum KvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed store file: {0}")]
    Format(#[from] serde_json::Error),
}

/// String key-value storage in the style of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    fn set(&self, key: &str, value: &str) -> Result<(), KvError>;
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object file. Every write rewrites the whole file;
/// concurrent writers from different processes are last-writer-wins.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileKeyValueStore { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, KvError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), KvError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// Favorite recipe ids in insertion order.
pub struct Favorites<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Favorites<S> {
    pub fn new(store: S) -> Self {
        Favorites { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current favorites. Missing or unreadable data reads as empty.
    pub fn list(&self) -> Vec<i64> {
        let raw = match self.store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed favorites");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.list().contains(&id)
    }

    /// Add `id` unless already present. Returns the resulting list.
    pub fn add(&self, id: i64) -> Result<Vec<i64>, KvError> {
        let mut ids = self.list();
        if !ids.contains(&id) {
            ids.push(id);
            self.write(&ids)?;
        }
        Ok(ids)
    }

    /// Drop every occurrence of `id`. Returns the resulting list.
    pub fn remove(&self, id: i64) -> Result<Vec<i64>, KvError> {
        let mut ids = self.list();
        ids.retain(|&existing| existing != id);
        self.write(&ids)?;
        Ok(ids)
    }

    /// Flip membership of `id`. Returns whether it is now a favorite.
    pub fn toggle(&self, id: i64) -> Result<bool, KvError> {
        if self.contains(id) {
            self.remove(id)?;
            Ok(false)
        } else {
            self.add(id)?;
            Ok(true)
        }
    }

    fn write(&self, ids: &[i64]) -> Result<(), KvError> {
        self.store.set(FAVORITES_KEY, &serde_json::to_string(ids)?)
    }
}
