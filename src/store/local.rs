//! Local persistent store.
//!
//! State (the global prefix plus all entries) is kept in memory and
//! mirrored to a JSON file after every mutation. The rewrite is atomic
//! (temp file + rename), so a crash mid-write leaves the previous state
//! intact. Opening with an unreadable or corrupt state file logs a warning
//! and starts empty — bad persisted state reads as missing, it does not
//! fail the open.

use super::entry::EntryMap;
use super::CacheStore;
use crate::error::{Error, Result};
use crate::types::EntryOptions;
use crate::value::Value;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persistent store backed by a JSON state file.
///
/// Without a backing path (see [`LocalStore::ephemeral`]) it behaves like a
/// memory store; the facade uses that mode when the cache is opened without
/// a directory.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: RwLock<EntryMap>,
}

impl LocalStore {
    /// Create a store with no backing file. Contents are lost on drop.
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            entries: RwLock::new(EntryMap::new()),
        }
    }

    /// Open a store backed by the state file at `path`, creating parent
    /// directories as needed and loading any existing state.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.is_dir() {
            return Err(Error::Storage(format!(
                "backing path {} is a directory",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<EntryMap>(&raw) {
                Ok(map) => {
                    debug!(path = %path.display(), entries = map.len(), "loaded local store state");
                    map
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt local store state, starting empty");
                    EntryMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => EntryMap::new(),
            Err(e) => return Err(Error::Io(e)),
        };

        Ok(Self {
            path: Some(path),
            entries: RwLock::new(entries),
        })
    }

    /// The backing file path, if this store persists.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Rewrite the state file from `map`. No-op for ephemeral stores.
    fn persist(&self, map: &EntryMap) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string(map)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl CacheStore for LocalStore {
    fn set(&self, key: &str, value: Value, options: &EntryOptions) -> Result<()> {
        let mut map = self.entries.write();
        map.insert(key, value, options, Utc::now());
        self.persist(&map)
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut map = self.entries.write();
        let before = map.len();
        let value = map.get(key, Utc::now());
        // expired entry was dropped, mirror that to disk
        if map.len() != before {
            self.persist(&map)?;
        }
        Ok(value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.entries.write();
        map.remove(key);
        self.persist(&map)
    }

    fn remove_all(&self) -> Result<()> {
        let mut map = self.entries.write();
        map.clear();
        self.persist(&map)
    }

    fn get_tag_data(&self, tag: &str) -> Result<HashMap<String, Value>> {
        let mut map = self.entries.write();
        let before = map.len();
        let data = map.tag_data(tag, Utc::now());
        if map.len() != before {
            self.persist(&map)?;
        }
        Ok(data)
    }

    fn remove_tag(&self, tag: &str) -> Result<()> {
        let mut map = self.entries.write();
        map.remove_tag(tag);
        self.persist(&map)
    }

    fn set_global_prefix(&self, prefix: &str) -> Result<()> {
        let mut map = self.entries.write();
        map.set_prefix(prefix);
        self.persist(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-store.json");

        let store = LocalStore::open(&path).unwrap();
        store
            .set("k", Value::String("persisted".into()), &EntryOptions::new())
            .unwrap();
        drop(store);

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("k").unwrap(),
            Some(Value::String("persisted".into()))
        );
    }

    #[test]
    fn prefix_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-store.json");

        let store = LocalStore::open(&path).unwrap();
        store.set_global_prefix("v2/").unwrap();
        store.set("k", Value::Int(1), &EntryOptions::new()).unwrap();
        drop(store);

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some(Value::Int(1)));
    }

    #[test]
    fn corrupt_state_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-store.json");
        fs::write(&path, "{ not json").unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);

        // the store is usable and persists over the corrupt file
        store.set("k", Value::Int(1), &EntryOptions::new()).unwrap();
        drop(store);
        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some(Value::Int(1)));
    }

    #[test]
    fn expired_entry_is_pruned_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-store.json");

        let store = LocalStore::open(&path).unwrap();
        store
            .set(
                "gone",
                Value::Int(1),
                &EntryOptions::new().with_expires_at(Utc::now() - chrono::Duration::seconds(1)),
            )
            .unwrap();
        assert_eq!(store.get("gone").unwrap(), None);
        drop(store);

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get("gone").unwrap(), None);
    }

    #[test]
    fn directory_backing_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn ephemeral_store_writes_nothing() {
        let store = LocalStore::ephemeral();
        store.set("k", Value::Int(1), &EntryOptions::new()).unwrap();
        assert_eq!(store.path(), None);
        assert_eq!(store.get("k").unwrap(), Some(Value::Int(1)));
    }

    #[test]
    fn max_age_entry_still_live_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-store.json");

        let store = LocalStore::open(&path).unwrap();
        store
            .set(
                "k",
                Value::Int(1),
                &EntryOptions::new().with_max_age(Duration::from_secs(3600)),
            )
            .unwrap();
        drop(store);

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some(Value::Int(1)));
    }
}
