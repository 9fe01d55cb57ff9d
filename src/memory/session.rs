//! Session memory: load, record and flush the per-user state
//!
//! Loading is lenient: a missing, unreadable or corrupt blob falls back to its
//! default, one key at a time. Saving overwrites every key.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::memory::store::BlobStore;
use crate::memory::types::{MemoryLimits, SessionState};
use crate::sentiment::Sentiment;

pub const PROFILE_KEY: &str = "nova_profile";
pub const HISTORY_KEY: &str = "nova_history";
pub const CORRECTIONS_KEY: &str = "nova_corrections";
pub const CONTEXTS_KEY: &str = "nova_contexts";

/// Every key the session memory owns
pub const ALL_KEYS: &[&str] = &[PROFILE_KEY, HISTORY_KEY, CORRECTIONS_KEY, CONTEXTS_KEY];

/// Session memory bound to a blob store
#[derive(Clone)]
pub struct SessionMemory {
    store: Arc<dyn BlobStore>,
    limits: MemoryLimits,
}

impl SessionMemory {
    pub fn new(store: Arc<dyn BlobStore>, limits: MemoryLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> &MemoryLimits {
        &self.limits
    }

    /// Load the full session state, never failing
    pub fn load_state(&self) -> SessionState {
        let mut state = SessionState {
            profile: self.load_key(PROFILE_KEY),
            log: self.load_key(HISTORY_KEY),
            corrections: self.load_key(CORRECTIONS_KEY),
            contexts: self.load_key(CONTEXTS_KEY),
        };

        // Files edited by hand may exceed the caps
        let moods = state.profile.mood_history.len();
        if moods > self.limits.max_mood_history {
            state.profile.mood_history.drain(..moods - self.limits.max_mood_history);
        }
        let entries = state.log.len();
        if entries > self.limits.max_persisted_log {
            state.log.drain(..entries - self.limits.max_persisted_log);
        }

        state
    }

    /// Record one user turn on the state
    pub fn record_turn(&self, state: &mut SessionState, text: &str, sentiment: Sentiment) {
        state.record_turn(text, sentiment, &self.limits);
    }

    /// Persist the full state; the log is truncated to the persisted cap
    pub fn save_state(&self, state: &SessionState) -> Result<()> {
        let start = state.log.len().saturating_sub(self.limits.max_persisted_log);

        self.save_key(PROFILE_KEY, &state.profile)?;
        self.save_key(HISTORY_KEY, &state.log[start..])?;
        self.save_key(CORRECTIONS_KEY, &state.corrections)?;
        self.save_key(CONTEXTS_KEY, &state.contexts)?;

        debug!(log_entries = state.log.len() - start, corrections = state.corrections.len(), "session saved");
        Ok(())
    }

    /// Save, logging and swallowing failures
    pub fn save_best_effort(&self, state: &SessionState) {
        if let Err(e) = self.save_state(state) {
            warn!(error = %e, "failed to persist session; continuing in memory");
        }
    }

    /// Delete every persisted key
    pub fn clear(&self) -> Result<()> {
        for key in ALL_KEYS {
            self.store.remove(key)?;
        }
        Ok(())
    }

    fn load_key<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.get(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(key, error = %e, "discarding malformed session blob");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key, error = %e, "failed to load session blob; starting fresh");
                T::default()
            }
        }
    }

    fn save_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value)?;
        self.store.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NovaError;
    use crate::memory::corrections::parse_correction;
    use crate::memory::store::{JsonFileStore, MemoryStore};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    struct FailingStore;

    impl BlobStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<Value>> {
            Err(NovaError::Persistence { key: key.to_string(), reason: "offline".to_string() })
        }
        fn set(&self, key: &str, _value: &Value) -> Result<()> {
            Err(NovaError::Persistence { key: key.to_string(), reason: "offline".to_string() })
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn memory_with(store: Arc<dyn BlobStore>) -> SessionMemory {
        SessionMemory::new(store, MemoryLimits::default())
    }

    #[test]
    fn test_fresh_store_gives_default_state() {
        let memory = memory_with(Arc::new(MemoryStore::new()));
        assert_eq!(memory.load_state(), SessionState::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let memory = memory_with(Arc::new(JsonFileStore::new(temp.path()).unwrap()));

        let mut state = memory.load_state();
        state.profile.name = Some("Budi".to_string());
        memory.record_turn(&mut state, "halo", Sentiment::Neutral);
        state.corrections.learn(parse_correction("ibukota seharusnya: Jakarta").unwrap());
        state.contexts.learn("rendang".into(), "masakan Padang".into());
        memory.save_state(&state).unwrap();

        let loaded = memory.load_state();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_persisted_log_is_truncated() {
        let store = Arc::new(MemoryStore::new());
        let memory = memory_with(store.clone());

        let mut state = SessionState::new();
        let unbounded = MemoryLimits { max_mood_history: 50, max_persisted_log: 1000 };
        for i in 0..150 {
            state.record_turn(&format!("m{}", i), Sentiment::Neutral, &unbounded);
        }
        memory.save_state(&state).unwrap();

        let history = store.get(HISTORY_KEY).unwrap().unwrap();
        let entries = history.as_array().unwrap();
        assert_eq!(entries.len(), 100);
        assert_eq!(entries[0]["text"], "m50");
    }

    #[test]
    fn test_corrupt_blob_falls_back_per_key() {
        let store = Arc::new(MemoryStore::new());
        store.set(PROFILE_KEY, &json!({"name": "Sari"})).unwrap();
        store.set(HISTORY_KEY, &json!("not a list")).unwrap();

        let state = memory_with(store).load_state();
        assert_eq!(state.profile.name.as_deref(), Some("Sari"));
        assert!(state.log.is_empty());
    }

    #[test]
    fn test_failing_store_never_panics() {
        let memory = memory_with(Arc::new(FailingStore));
        let mut state = memory.load_state();
        assert_eq!(state, SessionState::default());

        memory.record_turn(&mut state, "halo", Sentiment::Neutral);
        assert!(memory.save_state(&state).is_err());
        memory.save_best_effort(&state);
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = Arc::new(MemoryStore::new());
        let memory = memory_with(store.clone());
        let mut state = SessionState::new();
        memory.record_turn(&mut state, "halo", Sentiment::Neutral);
        memory.save_state(&state).unwrap();

        memory.clear().unwrap();
        for key in ALL_KEYS {
            assert!(store.get(key).unwrap().is_none());
        }
    }
}
