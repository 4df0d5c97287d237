//! Best-effort preference persistence
//!
//! The engine remembers two small preferences across sessions: the last
//! successfully started player count and the recent-word history. Both
//! live behind the [`KeyValueStore`] trait so the embedding application
//! can plug in whatever platform store it has. Persistence is strictly
//! best-effort: a missing or corrupt value reads as absent, and a failed
//! write is logged and otherwise ignored. The engine never depends on a
//! write having succeeded.

use std::collections::HashMap;

use thiserror::Error;

use crate::{
    constants::storage::{LAST_COUNT_KEY, RECENT_WORDS_KEY},
    picker::RecentHistory,
};

/// Error reported by a preference store implementation
///
/// The engine treats every store error the same way: log it and fall
/// back to the in-memory value, so implementations are free to put
/// whatever diagnostic text they like in here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("preference store error: {message}")]
pub struct StoreError {
    /// Description of the underlying platform failure
    pub message: String,
}

/// String-keyed store for the two persisted preferences
///
/// Implementations wrap the platform's storage (browser local storage, a
/// settings file, etc.). Both operations are allowed to fail; the engine
/// swallows failures after logging them.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the underlying store is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the underlying store is unavailable
    /// or out of space.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory [`KeyValueStore`] implementation
///
/// Useful for tests and for hosts without durable storage; preferences
/// then simply last for the lifetime of the store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Loads the remembered player count
///
/// Returns `None` when the value is missing, unreadable, or not a number.
pub fn load_last_count<K: KeyValueStore>(store: &K) -> Option<usize> {
    match store.get(LAST_COUNT_KEY) {
        Ok(value) => value.and_then(|raw| raw.parse().ok()),
        Err(error) => {
            tracing::warn!(%error, "failed to read remembered player count");
            None
        }
    }
}

/// Persists the remembered player count, best-effort
pub fn save_last_count<K: KeyValueStore>(store: &mut K, count: usize) {
    if let Err(error) = store.set(LAST_COUNT_KEY, &count.to_string()) {
        tracing::warn!(%error, "failed to persist remembered player count");
    }
}

/// Loads the recent-word history
///
/// Returns an empty history when the value is missing, unreadable, or
/// not a JSON string array.
pub fn load_recent_words<K: KeyValueStore>(store: &K) -> RecentHistory {
    let raw = match store.get(RECENT_WORDS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return RecentHistory::new(),
        Err(error) => {
            tracing::warn!(%error, "failed to read recent-word history");
            return RecentHistory::new();
        }
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(words) => RecentHistory::from_words(words),
        Err(error) => {
            tracing::warn!(%error, "recent-word history is corrupt, ignoring it");
            RecentHistory::new()
        }
    }
}

/// Persists the recent-word history, best-effort
pub fn save_recent_words<K: KeyValueStore>(store: &mut K, recent: &RecentHistory) {
    let encoded = serde_json::to_string(recent).expect("default serializer cannot fail");
    if let Err(error) = store.set(RECENT_WORDS_KEY, &encoded) {
        tracing::warn!(%error, "failed to persist recent-word history");
    }
}
