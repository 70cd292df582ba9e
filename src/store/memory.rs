//! Process-memory store.

use super::entry::EntryMap;
use super::CacheStore;
use crate::error::Result;
use crate::types::EntryOptions;
use crate::value::Value;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory store backed by a plain entry map.
///
/// Contents live as long as the store; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<EntryMap>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn set(&self, key: &str, value: Value, options: &EntryOptions) -> Result<()> {
        self.entries.write().insert(key, value, options, Utc::now());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.write().get(key, Utc::now()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn remove_all(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn get_tag_data(&self, tag: &str) -> Result<HashMap<String, Value>> {
        Ok(self.entries.write().tag_data(tag, Utc::now()))
    }

    fn remove_tag(&self, tag: &str) -> Result<()> {
        self.entries.write().remove_tag(tag);
        Ok(())
    }

    fn set_global_prefix(&self, prefix: &str) -> Result<()> {
        self.entries.write().set_prefix(prefix);
        Ok(())
    }
}
