//! Durable key-value preferences
//!
//! The app keeps two values: the favorites string set and the first-launch
//! flag. Both live in one JSON document on disk, rewritten whole on every
//! change.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::errors::StorageError;

pub const FAVORITE_LOCATIONS_KEY: &str = "favoriteLocations";
pub const FIRST_LAUNCH_KEY: &str = "isFirstLaunch";

/// Simple typed key-value store with whole-value overwrites
pub trait KeyValueStore: Send + Sync {
    fn get_string_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, StorageError>;

    /// Replace the set stored under `key` in a single write
    fn put_string_set(&self, key: &str, values: BTreeSet<String>) -> Result<(), StorageError>;

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError>;

    fn put_bool(&self, key: &str, value: bool) -> Result<(), StorageError>;
}

/// Handle passed to every component that reads or writes preferences
pub type SharedStore = Arc<dyn KeyValueStore>;

fn lock(document: &Mutex<Map<String, Value>>) -> MutexGuard<'_, Map<String, Value>> {
    document.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read_string_set(
    document: &Map<String, Value>,
    key: &str,
) -> Result<Option<BTreeSet<String>>, StorageError> {
    let Some(value) = document.get(key) else {
        return Ok(None);
    };
    let wrong_type = || StorageError::WrongType {
        key: key.to_string(),
        expected: "string set",
    };
    let items = value.as_array().ok_or_else(wrong_type)?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong_type))
        .collect::<Result<BTreeSet<_>, _>>()
        .map(Some)
}

fn read_bool(document: &Map<String, Value>, key: &str) -> Result<Option<bool>, StorageError> {
    match document.get(key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(StorageError::WrongType {
            key: key.to_string(),
            expected: "bool",
        }),
    }
}

fn string_set_value(values: BTreeSet<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}

/// Preferences backed by a JSON file.
///
/// Nothing is cached: every get reads the file and every put re-reads it,
/// merges the key, then writes a sibling temp file and renames it over the
/// old one. A CLI run writing the same file is therefore never overwritten
/// with stale data.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the preferences file, starting empty if it does not exist yet.
    /// Fails if the file exists but cannot be read as a JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        };

        let document = store.read_document()?;
        debug!(
            "Loaded {} preference keys from {}",
            document.len(),
            store.path.display()
        );
        Ok(store)
    }

    fn read_document(&self) -> Result<Map<String, Value>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No preferences file at {}, starting fresh", self.path.display());
                Ok(Map::new())
            }
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persist(&self, document: &Map<String, Value>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(document)?;
        let temp_path = self.temp_path();

        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        std::fs::write(&temp_path, content).map_err(write_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(write_err)?;

        debug!("Wrote preferences to {}", self.path.display());
        Ok(())
    }

    fn update(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        self.persist(&document)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_string_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, StorageError> {
        read_string_set(&self.read_document()?, key)
    }

    fn put_string_set(&self, key: &str, values: BTreeSet<String>) -> Result<(), StorageError> {
        self.update(key, string_set_value(values))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError> {
        read_bool(&self.read_document()?, key)
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<(), StorageError> {
        self.update(key, Value::Bool(value))
    }
}

/// Non-durable store, used by tests and `--ephemeral` runs
#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, StorageError> {
        read_string_set(&lock(&self.document), key)
    }

    fn put_string_set(&self, key: &str, values: BTreeSet<String>) -> Result<(), StorageError> {
        lock(&self.document).insert(key.to_string(), string_set_value(values));
        Ok(())
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError> {
        read_bool(&lock(&self.document), key)
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<(), StorageError> {
        lock(&self.document).insert(key.to_string(), Value::Bool(value));
        Ok(())
    }
}

/// App-level flags stored next to the favorites
#[derive(Clone)]
pub struct Preferences {
    store: SharedStore,
}

impl Preferences {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// True until the welcome screen has been dismissed once
    pub fn is_first_launch(&self) -> bool {
        match self.store.get_bool(FIRST_LAUNCH_KEY) {
            Ok(value) => value.unwrap_or(true),
            Err(e) => {
                tracing::error!("Failed to read first-launch flag: {}", e);
                true
            }
        }
    }

    pub fn complete_first_launch(&self) -> Result<(), StorageError> {
        info!("First launch completed");
        self.store.put_bool(FIRST_LAUNCH_KEY, false)
    }
}
