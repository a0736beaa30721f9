//! Storage capability trait and the in-memory backend.

use std::collections::HashMap;

use crate::domain::Result;

/// Durable key-value storage for serialized session state.
///
/// The session persists the full bookmark set under a single key on every
/// mutation and reads it back once at start. Implementations only need
/// whole-value get/set semantics; there is no partial update.
///
/// # Thread Safety
///
/// Implementations must be `Send`: the store is owned by the session task and
/// may move with it, but is never shared.
pub trait KeyValueStore: Send {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile in-memory backend.
///
/// Used by headless tests and as a fallback when no durable location is
/// available; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("bookmarks").unwrap(), None);

        store.set("bookmarks", "[]").unwrap();
        assert_eq!(store.get("bookmarks").unwrap().as_deref(), Some("[]"));

        store.set("bookmarks", "[1]").unwrap();
        assert_eq!(store.get("bookmarks").unwrap().as_deref(), Some("[1]"));

        store.remove("bookmarks").unwrap();
        assert_eq!(store.get("bookmarks").unwrap(), None);
    }
}
