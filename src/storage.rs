//! Persistent key-value storage for entry collections.
//!
//! Each domain collection lives under its own key as one JSON array. A
//! mutation always rewrites the whole array for that key.
use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace, warn};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::{JournalError, Result};

/// A string key-value store scoped to one user's data, in the manner of a
/// browser's origin-local storage.
pub trait KeyValueStore {
    /// Returns the raw value under `key`, or `None` when nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores every key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                JournalError::DirectoryError { path: dir.clone() }
            })?;
        }
        info!("Opened file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            trace!("No value stored under {}", key);
            return Ok(None);
        }

        let value = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            JournalError::Io(e)
        })?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        debug!("Writing {} bytes to {}", value.len(), path.display());

        // Write next to the target and rename over it so readers never see
        // a half-written collection.
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            JournalError::Io(e)
        })?;

        temp_file.write_all(value.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            JournalError::Io(e)
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            JournalError::Io(e)
        })?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            JournalError::Io(e.error)
        })?;

        trace!("Stored value under {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!("Removed {}", path.display());
        }
        Ok(())
    }
}

/// Volatile store, handy for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reads the collection stored under `key`.
///
/// Absent, unreadable or malformed data yields an empty collection; the
/// problem is logged and never surfaced.
pub fn load_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Could not read collection {}: {}", key, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            debug!("Loaded {} records from {}", items.len(), key);
            items
        }
        Err(e) => {
            warn!("Ignoring malformed collection {}: {}", key, e);
            Vec::new()
        }
    }
}

/// Rewrites the whole collection under `key`.
pub fn save_collection<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items).map_err(|e| {
        error!("Failed to serialize collection {}: {}", key, e);
        JournalError::Serialization(e)
    })?;
    store.set(key, &json)?;
    debug!("Saved {} records to {}", items.len(), key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: i64,
        text: String,
    }

    #[test]
    fn absent_key_loads_empty() {
        let store = MemoryStore::new();
        let items: Vec<Item> = load_collection(&store, "missing");
        assert!(items.is_empty());
    }

    #[test]
    fn malformed_value_loads_empty() {
        let store = MemoryStore::new();
        store.set("todos", "{not json").unwrap();
        let items: Vec<Item> = load_collection(&store, "todos");
        assert!(items.is_empty());

        store.set("todos", r#"{"id": 1}"#).unwrap();
        let items: Vec<Item> = load_collection(&store, "todos");
        assert!(items.is_empty());
    }

    #[test]
    fn collection_is_written_as_json_array() {
        let store = MemoryStore::new();
        let items = vec![
            Item { id: 1, text: "a".into() },
            Item { id: 2, text: "b".into() },
        ];
        save_collection(&store, "todos", &items).unwrap();

        let raw = store.get("todos").unwrap().unwrap();
        assert!(raw.starts_with('['));
        let loaded: Vec<Item> = load_collection(&store, "todos");
        assert_eq!(loaded, items);
    }

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.get("notes").unwrap(), None);
        store.set("notes", "[]").unwrap();
        assert_eq!(store.get("notes").unwrap().as_deref(), Some("[]"));
        assert!(store.dir().join("notes.json").exists());

        store.remove("notes").unwrap();
        assert_eq!(store.get("notes").unwrap(), None);
        store.remove("notes").unwrap();
    }
}
