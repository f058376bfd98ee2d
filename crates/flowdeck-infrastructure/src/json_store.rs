//! File-backed state store.
//!
//! Each key maps to one `<key>.json` file under a state directory. Writes
//! are atomic (tmp file + fsync + rename) and serialized with an
//! exclusive file lock so an interrupted write never leaves a truncated
//! blob behind. Reads treat a missing, unreadable or unparsable file as
//! "no prior state".
//!
//! Cross-process coordination is deliberately last-writer-wins: two
//! instances sharing the same directory do not invalidate each other.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use serde_json::Value;

use flowdeck_core::error::{FlowdeckError, Result};
use flowdeck_core::store::StateStore;

/// A state store that keeps one JSON file per key.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily
    /// on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.json.tmp"))
    }

    /// Acquires an exclusive lock guarding writes to `key`.
    fn acquire_lock(&self, key: &str) -> Result<FileLock> {
        FileLock::acquire(&self.entry_path(key))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                // An unreadable entry counts as absent, same as a
                // corrupt one; the caller re-seeds.
                tracing::warn!(key, %err, "ignoring unreadable state file");
                return Ok(None);
            }
        };
        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                // Corrupt entries count as absent; the caller re-seeds.
                tracing::warn!(key, %err, "ignoring corrupt state file");
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let _lock = self.acquire_lock(key)?;

        let serialized = serde_json::to_string_pretty(value)?;

        // Write to a temporary file in the same directory, then rename.
        let tmp_path = self.temp_path(key);
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(serialized.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, self.entry_path(key))?;

        tracing::debug!(key, "state saved");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| {
                FlowdeckError::storage(format!("Failed to acquire lock: {}", e))
            })?;
        }

        #[cfg(not(unix))]
        {
            // No file locking off Unix; acceptable for a single-user
            // client process.
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped.
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_dir, store) = store();
        let value = json!({ "name": "Nightly Report", "active": true });

        store.save("flowdeck-workflows", &value).unwrap();
        let loaded = store.load("flowdeck-workflows").unwrap().unwrap();

        assert_eq!(loaded, value);
    }

    #[test]
    fn missing_key_loads_as_none() {
        let (_dir, store) = store();
        assert!(store.load("flowdeck-session").unwrap().is_none());
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let (dir, store) = store();
        fs::write(dir.path().join("flowdeck-profile.json"), "{not json").unwrap();

        assert!(store.load("flowdeck-profile").unwrap().is_none());
    }

    #[test]
    fn unreadable_entry_loads_as_none() {
        let (dir, store) = store();
        // A directory squatting on the entry path makes the read fail
        // without the file being missing or malformed.
        fs::create_dir(dir.path().join("flowdeck-session.json")).unwrap();

        assert!(store.load("flowdeck-session").unwrap().is_none());
    }

    #[test]
    fn empty_file_loads_as_none() {
        let (dir, store) = store();
        fs::write(dir.path().join("flowdeck-profile.json"), "  ").unwrap();

        assert!(store.load("flowdeck-profile").unwrap().is_none());
    }

    #[test]
    fn save_replaces_previous_value() {
        let (_dir, store) = store();

        store.save("flowdeck-session", &json!({ "id": "1" })).unwrap();
        store.save("flowdeck-session", &json!({ "id": "2" })).unwrap();

        let loaded = store.load("flowdeck-session").unwrap().unwrap();
        assert_eq!(loaded["id"], "2");
    }

    #[test]
    fn remove_is_idempotent() {
        let (_dir, store) = store();

        store.save("flowdeck-session", &json!({ "id": "1" })).unwrap();
        store.remove("flowdeck-session").unwrap();
        store.remove("flowdeck-session").unwrap();

        assert!(store.load("flowdeck-session").unwrap().is_none());
    }

    #[test]
    fn no_temp_file_left_after_save() {
        let (dir, store) = store();

        store.save("flowdeck-workflows", &json!([])).unwrap();

        assert!(!dir.path().join(".flowdeck-workflows.json.tmp").exists());
        assert!(dir.path().join("flowdeck-workflows.json").exists());
    }

    #[test]
    fn typed_helpers_round_trip() {
        use flowdeck_core::store::{load_json, save_json};

        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Blob {
            id: String,
        }

        let (_dir, store) = store();
        let blob = Blob {
            id: "abc".to_string(),
        };

        save_json(&store, "flowdeck-session", &blob).unwrap();
        let loaded: Option<Blob> = load_json(&store, "flowdeck-session").unwrap();

        assert_eq!(loaded, Some(blob));
    }
}
