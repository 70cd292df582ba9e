//! Main cache entry point.
//!
//! This module provides the [`CacheMux`] struct, the routing facade over
//! the three backend stores, and its builder.

use crate::error::Result;
use crate::index::KeyIndex;
use crate::store::{CacheStore, LocalStore, MemoryStore, SessionStore};
use crate::types::{EntryOptions, StoreKind};
use crate::value::Value;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use uuid::Uuid;

/// File name of the local store's persisted state, under the cache directory.
const LOCAL_STATE_FILE: &str = "local-store.json";

/// The multiplexing cache.
///
/// `CacheMux` routes every operation to exactly one of its three stores
/// (session-scoped, local-persistent, in-memory) through its key index,
/// and enforces that a logical key lives in at most one store at a time.
/// Client code never touches a store directly.
///
/// # Example
///
/// ```ignore
/// use cachemux::prelude::*;
///
/// // Disk-backed local store under ./cache
/// let cache = CacheMux::open("./cache")?;
///
/// cache.set("user:1", "Alice", StoreKind::LocalPersistent)?;
/// cache.set("draft", "...", StoreKind::SessionScoped)?;
///
/// let name = cache.get("user:1")?;
///
/// // Bulk operations
/// cache.remove_all_in(StoreKind::SessionScoped)?;
/// cache.remove_all()?;
/// ```
pub struct CacheMux {
    session: SessionStore,
    local: LocalStore,
    memory: MemoryStore,
    /// Authoritative key -> store ownership map. Owned here, never ambient,
    /// so independent cache instances coexist.
    index: RwLock<KeyIndex>,
}

impl CacheMux {
    /// Open a cache whose local-persistent store is backed by a state file
    /// under `dir` (created if missing).
    ///
    /// The key index always starts empty: the store contract has no key
    /// enumeration, so entries persisted by a previous process are not
    /// re-indexed. They remain reachable through [`CacheMux::get_tag_data`]
    /// (which delegates without consulting the index) and are overwritten
    /// in place by a fresh `set`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let cache = CacheMux::open("./cache")?;
    /// ```
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(dir).open()
    }

    /// Create a cache with no disk I/O at all.
    ///
    /// The local-persistent store runs without a backing file, so all three
    /// stores are in-memory and everything is lost on drop. Use for tests
    /// and caching-only scenarios.
    pub fn ephemeral() -> Self {
        Self {
            session: SessionStore::new(),
            local: LocalStore::ephemeral(),
            memory: MemoryStore::new(),
            index: RwLock::new(KeyIndex::new()),
        }
    }

    /// Create a builder for cache configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let cache = CacheMux::builder()
    ///     .path("./cache")
    ///     .prefix(StoreKind::LocalPersistent, "myapp/")
    ///     .open()?;
    /// ```
    pub fn builder() -> CacheMuxBuilder {
        CacheMuxBuilder::new()
    }

    /// Resolve a store identifier to its store. The only dispatch point;
    /// exhaustive so a new store kind is a compile-time-checked change.
    fn store(&self, kind: StoreKind) -> &dyn CacheStore {
        match kind {
            StoreKind::SessionScoped => &self.session,
            StoreKind::LocalPersistent => &self.local,
            StoreKind::InMemory => &self.memory,
        }
    }

    /// Store `value` under `key` in the store identified by `kind`.
    ///
    /// If the key currently lives in a *different* store it is first fully
    /// removed from there (eviction-on-reassignment, not rejection), so a
    /// key never exists in two stores at once. A same-store `set` is a
    /// plain overwrite.
    ///
    /// Errors from the target store propagate unchanged; on a failed write
    /// after an eviction the key is absent from every store.
    ///
    /// # Example
    ///
    /// ```ignore
    /// cache.set("user:1", "Alice", StoreKind::InMemory)?;
    /// cache.set("count", 42, StoreKind::SessionScoped)?;
    /// ```
    pub fn set(&self, key: &str, value: impl Into<Value>, kind: StoreKind) -> Result<()> {
        self.set_with_options(key, value, kind, EntryOptions::new())
    }

    /// Store `value` under `key` with per-entry options (tag, expiry).
    ///
    /// # Example
    ///
    /// ```ignore
    /// cache.set_with_options(
    ///     "user:1",
    ///     "Alice",
    ///     StoreKind::InMemory,
    ///     EntryOptions::new().with_tag("users"),
    /// )?;
    /// ```
    pub fn set_with_options(
        &self,
        key: &str,
        value: impl Into<Value>,
        kind: StoreKind,
        options: EntryOptions,
    ) -> Result<()> {
        let prior = self.index.read().lookup(key);
        if let Some(old) = prior {
            if old != kind {
                debug!(key, prior = %old, next = %kind, "evicting key from prior store");
                self.store(old).remove(key)?;
                self.index.write().forget(key);
            }
        }

        self.store(kind).set(key, value.into(), &options)?;
        // recorded only after the write succeeded
        self.index.write().record(key, kind);
        trace!(key, store = %kind, "set");
        Ok(())
    }

    /// Read the value for `key`.
    ///
    /// An unindexed key returns `Ok(None)` without touching any store.
    /// An indexed key is read from exactly the owning store — never by
    /// probing others. A store's "nothing" (missing or expired entry)
    /// is `None`.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let Some(kind) = self.index.read().lookup(key) else {
            trace!(key, "get: unindexed");
            return Ok(None);
        };
        self.store(kind).get(key)
    }

    /// Read the value for `key`, deserialized into `T`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let count: Option<i64> = cache.get_as("count")?;
    /// ```
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)?
            .map(|value| serde_json::from_value(value.to_json()))
            .transpose()
            .map_err(Into::into)
    }

    /// Check whether `key` holds a value.
    ///
    /// Defined as index membership plus a non-`None` read from the owning
    /// store — independent of the value itself, so stored `Int(0)`,
    /// `Bool(false)`, `String("")` and even `Value::Null` all exist.
    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove `key` from whichever store owns it.
    ///
    /// Returns `Ok(false)` without delegation when the key is unindexed;
    /// otherwise delegates removal to the owning store, then drops the
    /// index entry, and returns `Ok(true)`.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let Some(kind) = self.index.read().lookup(key) else {
            return Ok(false);
        };
        self.store(kind).remove(key)?;
        self.index.write().forget(key);
        debug!(key, store = %kind, "removed");
        Ok(true)
    }

    /// Clear all three stores and reset the key index.
    ///
    /// This is a full reset: every store is cleared and the index emptied
    /// even if an individual store's clear fails; the first failure (if
    /// any) is returned afterward.
    pub fn remove_all(&self) -> Result<()> {
        debug!("clearing all stores");
        let results = [
            self.session.remove_all(),
            self.local.remove_all(),
            self.memory.remove_all(),
        ];
        self.index.write().forget_all();
        results.into_iter().collect()
    }

    /// Remove every indexed key owned by `kind`, leaving the other stores'
    /// keys untouched. Iteration order is unspecified.
    pub fn remove_all_in(&self, kind: StoreKind) -> Result<()> {
        let keys = self.index.read().keys_in(kind);
        debug!(store = %kind, count = keys.len(), "clearing store");
        for key in &keys {
            self.store(kind).remove(key)?;
            self.index.write().forget(key);
        }
        Ok(())
    }

    /// Live entries carrying `tag` in the store identified by `kind`,
    /// keyed by logical key. Pure delegation: the key index is neither
    /// consulted nor mutated — tag membership is store-internal.
    pub fn get_tag_data(&self, tag: &str, kind: StoreKind) -> Result<HashMap<String, Value>> {
        self.store(kind).get_tag_data(tag)
    }

    /// Remove every entry carrying `tag` from the store identified by
    /// `kind`.
    ///
    /// Pure delegation. The key index is deliberately *not* updated: it
    /// may keep carrying keys the purge removed, which is harmless —
    /// a later `get`/`exists` on such a key routes to the one store that
    /// owned it and finds nothing. Call [`CacheMux::remove`] per key if
    /// index hygiene matters to you.
    pub fn remove_tag(&self, tag: &str, kind: StoreKind) -> Result<()> {
        debug!(tag, store = %kind, "removing tag");
        self.store(kind).remove_tag(tag)
    }

    /// Set the global key prefix of the store identified by `kind`,
    /// affecting its future internal key namespacing only. No effect on
    /// the key index or the other stores.
    pub fn set_global_prefix(&self, prefix: &str, kind: StoreKind) -> Result<()> {
        debug!(prefix, store = %kind, "setting global prefix");
        self.store(kind).set_global_prefix(prefix)
    }

    /// Number of indexed keys across all stores.
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    /// True when no key is indexed.
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// The session store's id, minted at construction.
    pub fn session_id(&self) -> Uuid {
        self.session.session_id()
    }

    /// When the session store's session started.
    pub fn session_started_at(&self) -> DateTime<Utc> {
        self.session.started_at()
    }

    /// The local store's backing file path, if the cache persists.
    pub fn local_path(&self) -> Option<&Path> {
        self.local.path()
    }
}

/// Builder for cache configuration.
///
/// # Example
///
/// ```ignore
/// // Disk-backed, with an initial namespace on the persistent store
/// let cache = CacheMux::builder()
///     .path("./cache")
///     .prefix(StoreKind::LocalPersistent, "myapp/")
///     .open()?;
///
/// // No disk at all
/// let cache = CacheMux::ephemeral();
/// ```
#[derive(Debug, Default)]
pub struct CacheMuxBuilder {
    path: Option<PathBuf>,
    prefixes: Vec<(StoreKind, String)>,
}

impl CacheMuxBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory for the local-persistent store's state file.
    /// Without a path the local store runs in memory.
    pub fn path(mut self, dir: impl AsRef<Path>) -> Self {
        self.path = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an initial global prefix for one store.
    pub fn prefix(mut self, kind: StoreKind, prefix: impl Into<String>) -> Self {
        self.prefixes.push((kind, prefix.into()));
        self
    }

    /// Open the cache.
    pub fn open(self) -> Result<CacheMux> {
        let local = match &self.path {
            Some(dir) => LocalStore::open(dir.join(LOCAL_STATE_FILE))?,
            None => LocalStore::ephemeral(),
        };
        let cache = CacheMux {
            session: SessionStore::new(),
            local,
            memory: MemoryStore::new(),
            index: RwLock::new(KeyIndex::new()),
        };
        for (kind, prefix) in &self.prefixes {
            cache.set_global_prefix(prefix, *kind)?;
        }
        Ok(cache)
    }
}
