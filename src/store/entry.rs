//! Shared entry storage for the backend stores.
//!
//! All three stores keep their data in an [`EntryMap`]: a map from storage
//! key (global prefix + logical key) to a stored entry carrying the value,
//! an optional tag, and an optional expiry instant.
//!
//! Expiry is lazy: an expired entry reads as absent and is dropped on the
//! access that notices it. The routing layer is never notified — its index
//! may keep carrying the key, which is harmless because the index only ever
//! routes back to this store.
//!
//! The global prefix namespaces storage keys. Changing it makes entries
//! written under the old prefix unreachable through `get` and tag reads;
//! they still count against the map until cleared or purged by tag.

use crate::types::EntryOptions;
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One stored entry: the value plus store-internal bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredEntry {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Prefix-aware map of stored entries.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct EntryMap {
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    entries: HashMap<String, StoredEntry>,
}

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Insert or overwrite the entry for `key`.
    pub fn insert(&mut self, key: &str, value: Value, options: &EntryOptions, now: DateTime<Utc>) {
        let entry = StoredEntry {
            value,
            tag: options.tag.clone(),
            expires_at: options.effective_expiry(now),
        };
        self.entries.insert(self.storage_key(key), entry);
    }

    /// Read the live value for `key`; drops the entry when it has expired.
    pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        let storage_key = self.storage_key(key);
        match self.entries.get(&storage_key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(&storage_key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Remove the entry for `key`. No-op when absent.
    pub fn remove(&mut self, key: &str) {
        let storage_key = self.storage_key(key);
        self.entries.remove(&storage_key);
    }

    /// Remove every entry, regardless of prefix epoch.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Live entries carrying `tag` under the current prefix, keyed by
    /// logical key. Expired tagged entries are dropped along the way.
    pub fn tag_data(&mut self, tag: &str, now: DateTime<Utc>) -> HashMap<String, Value> {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.tag.as_deref() == Some(tag) && entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.entries.remove(&key);
        }

        self.entries
            .iter()
            .filter(|(_, entry)| entry.tag.as_deref() == Some(tag))
            .filter_map(|(storage_key, entry)| {
                storage_key
                    .strip_prefix(&self.prefix)
                    .map(|key| (key.to_string(), entry.value.clone()))
            })
            .collect()
    }

    /// Remove every entry carrying `tag`, regardless of prefix epoch.
    pub fn remove_tag(&mut self, tag: &str) {
        self.entries
            .retain(|_, entry| entry.tag.as_deref() != Some(tag));
    }

    /// Set the prefix applied to future storage keys.
    pub fn set_prefix(&mut self, prefix: &str) {
        self.prefix = prefix.to_string();
    }

    /// Number of stored entries, across all prefix epochs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn insert_then_get() {
        let mut map = EntryMap::new();
        map.insert("k", Value::Int(1), &EntryOptions::new(), now());
        assert_eq!(map.get("k", now()), Some(Value::Int(1)));
    }

    #[test]
    fn expired_entry_reads_as_absent_and_is_dropped() {
        let mut map = EntryMap::new();
        let written_at = now();
        map.insert(
            "k",
            Value::Int(1),
            &EntryOptions::new().with_max_age(Duration::from_secs(30)),
            written_at,
        );

        let later = written_at + chrono::Duration::seconds(31);
        assert_eq!(map.get("k", later), None);
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn entry_is_live_before_expiry() {
        let mut map = EntryMap::new();
        let written_at = now();
        map.insert(
            "k",
            Value::Int(1),
            &EntryOptions::new().with_max_age(Duration::from_secs(30)),
            written_at,
        );
        assert_eq!(
            map.get("k", written_at + chrono::Duration::seconds(29)),
            Some(Value::Int(1))
        );
    }

    #[test]
    fn tag_data_returns_logical_keys() {
        let mut map = EntryMap::new();
        map.set_prefix("app/");
        map.insert("u", Value::Int(1), &EntryOptions::new().with_tag("users"), now());
        map.insert("v", Value::Int(2), &EntryOptions::new().with_tag("users"), now());
        map.insert("other", Value::Int(3), &EntryOptions::new(), now());

        let data = map.tag_data("users", now());
        assert_eq!(data.len(), 2);
        assert_eq!(data["u"], Value::Int(1));
        assert_eq!(data["v"], Value::Int(2));
    }

    #[test]
    fn remove_tag_purges_only_tagged_entries() {
        let mut map = EntryMap::new();
        map.insert("u", Value::Int(1), &EntryOptions::new().with_tag("users"), now());
        map.insert("s", Value::Int(2), &EntryOptions::new().with_tag("sessions"), now());

        map.remove_tag("users");
        assert_eq!(map.get("u", now()), None);
        assert_eq!(map.get("s", now()), Some(Value::Int(2)));
    }

    #[test]
    fn prefix_change_hides_old_entries() {
        let mut map = EntryMap::new();
        map.insert("k", Value::Int(1), &EntryOptions::new(), now());
        map.set_prefix("v2/");
        assert_eq!(map.get("k", now()), None);

        map.insert("k", Value::Int(2), &EntryOptions::new(), now());
        assert_eq!(map.get("k", now()), Some(Value::Int(2)));
        assert_eq!(map.len(), 2);
    }
}
