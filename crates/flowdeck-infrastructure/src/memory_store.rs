//! In-memory state store.
//!
//! Shared test double for the persistence boundary. Also usable as a
//! throwaway store for ephemeral demo sessions. The `failing` switch
//! turns every save into an error so persist-then-commit behavior can be
//! exercised.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use flowdeck_core::error::{FlowdeckError, Result};
use flowdeck_core::store::StateStore;

/// A state store backed by a plain in-process map.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `failing` is true, every subsequent save returns an error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FlowdeckError::storage("simulated save failure"));
        }
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_load_remove() {
        let store = MemoryStore::new();

        store.save("flowdeck-session", &json!({ "id": "1" })).unwrap();
        assert_eq!(
            store.load("flowdeck-session").unwrap().unwrap()["id"],
            "1"
        );

        store.remove("flowdeck-session").unwrap();
        assert!(store.load("flowdeck-session").unwrap().is_none());
    }

    #[test]
    fn failing_switch_rejects_saves() {
        let store = MemoryStore::new();
        store.set_failing(true);

        let result = store.save("flowdeck-session", &json!({}));
        assert!(result.is_err());

        store.set_failing(false);
        store.save("flowdeck-session", &json!({})).unwrap();
    }
}
