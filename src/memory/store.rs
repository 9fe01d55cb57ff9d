//! Key-value blob stores backing the session memory
//!
//! Each key holds one JSON document. Writes are full overwrites.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::{NovaError, Result};

/// Key-value persistence for JSON blobs
pub trait BlobStore: Send + Sync {
    /// Read a blob; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a blob, replacing any previous value
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Delete a blob if present
    fn remove(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per blob inside a state directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create the store, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| NovaError::Persistence {
                key: dir.display().to_string(),
                reason: format!("Failed to create state directory: {}", e),
            })?;
        }
        Ok(Self { dir })
    }

    /// Directory holding the blobs
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(NovaError::Persistence {
                key: key.to_string(),
                reason: "keys may only contain [A-Za-z0-9_-]".to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl BlobStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| NovaError::Persistence {
            key: key.to_string(),
            reason: format!("Failed to read blob: {}", e),
        })?;

        let value = serde_json::from_str(&json).map_err(|e| NovaError::Persistence {
            key: key.to_string(),
            reason: format!("Failed to parse blob: {}", e),
        })?;

        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key)?;
        let json = serde_json::to_string_pretty(value)?;

        // Write next to the target, then rename over it
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| NovaError::Persistence {
                key: key.to_string(),
                reason: format!("Failed to write blob: {}", e),
            })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| NovaError::Persistence {
                key: key.to_string(),
                reason: format!("Failed to delete blob: {}", e),
            })?;
        }
        Ok(())
    }
}

/// Process-local store, used for `--ephemeral` sessions and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, key: &str) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.blobs.lock().map_err(|_| NovaError::Persistence {
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock(key)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.lock(key)?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock(key)?.remove(key);
        Ok(())
    }
}
