//! Session-scoped store.

use super::entry::EntryMap;
use super::CacheStore;
use crate::error::Result;
use crate::types::EntryOptions;
use crate::value::Value;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Store scoped to one cache session.
///
/// A fresh session id (uuid v4) is minted at construction and the start
/// instant recorded; contents never touch disk and are gone when the store
/// is dropped. This mirrors browser session storage: a new process or a new
/// cache instance is a new session with an empty store.
#[derive(Debug)]
pub struct SessionStore {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    entries: RwLock<EntryMap>,
}

impl SessionStore {
    /// Start a new session with an empty store.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            entries: RwLock::new(EntryMap::new()),
        }
    }

    /// This session's id.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// When this session started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for SessionStore {
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
