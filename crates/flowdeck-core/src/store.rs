//! Persisted key-value store boundary.
//!
//! The store holds JSON blobs under a small set of fixed keys. It is the
//! only durable persistence surface the state containers know about; the
//! concrete backing (files on disk, in-memory map for tests) lives in the
//! infrastructure crate.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

/// Store key for the current session record.
pub const KEY_SESSION: &str = "flowdeck-session";

/// Store key for the current profile record.
pub const KEY_PROFILE: &str = "flowdeck-profile";

/// Store key for the workflow list.
pub const KEY_WORKFLOWS: &str = "flowdeck-workflows";

/// An abstract persisted key-value store.
///
/// Values are JSON blobs. A missing or unparsable entry is reported as
/// `Ok(None)` on load, never as an error: callers treat absence as "no
/// prior state". Saves are best-effort and may fail; whether a failed
/// save is fatal is the caller's decision.
///
/// The trait is object-safe so services can hold an `Arc<dyn StateStore>`;
/// the typed helpers below layer serde on top.
pub trait StateStore: Send + Sync {
    /// Loads the value stored under `key`, or `None` if absent or corrupt.
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Saves `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &Value) -> Result<()>;

    /// Removes the value stored under `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Loads and deserializes the value stored under `key`.
///
/// A value that is present but does not deserialize into `T` is treated
/// the same as a corrupt entry: logged and reported as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Result<Option<T>> {
    let Some(value) = store.load(key)? else {
        return Ok(None);
    };

    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            tracing::warn!(key, %err, "discarding stored value with unexpected shape");
            Ok(None)
        }
    }
}

/// Serializes `value` and saves it under `key`.
pub fn save_json<T: Serialize>(store: &dyn StateStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_value(value)?;
    store.save(key, &json)
}
