//! Key ownership index.
//!
//! The [`KeyIndex`] is the authoritative record of which store currently
//! holds each logical key. It enforces the no-key-splitting invariant at
//! the routing layer: at most one [`StoreKind`] per key, and every lookup
//! routes to exactly that store, never by probing.
//!
//! The index is an explicit field of the facade, not ambient state, so
//! independent cache instances coexist and test in isolation. Stores may
//! expire entries without notifying the index; the facade treats a store's
//! "nothing" as absent even while the index still carries the key.

use crate::types::StoreKind;
use std::collections::HashMap;

/// Mapping from logical key to the store that owns it.
#[derive(Debug, Default)]
pub(crate) struct KeyIndex {
    entries: HashMap<String, StoreKind>,
}

impl KeyIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Which store owns `key`, if any. No side effects.
    pub fn lookup(&self, key: &str) -> Option<StoreKind> {
        self.entries.get(key).copied()
    }

    /// Record `key` as owned by `kind`, overwriting any prior association.
    pub fn record(&mut self, key: &str, kind: StoreKind) {
        self.entries.insert(key.to_string(), kind);
    }

    /// Drop the association for `key`. No-op when absent.
    pub fn forget(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop every association (global clear).
    pub fn forget_all(&mut self) {
        self.entries.clear();
    }

    /// All keys currently owned by `kind`, in unspecified order.
    pub fn keys_in(&self, kind: StoreKind) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, owner)| **owner == kind)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of indexed keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_unrecorded_key_is_none() {
        let index = KeyIndex::new();
        assert_eq!(index.lookup("missing"), None);
    }

    #[test]
    fn record_overwrites_prior_owner() {
        let mut index = KeyIndex::new();
        index.record("k", StoreKind::SessionScoped);
        index.record("k", StoreKind::InMemory);
        assert_eq!(index.lookup("k"), Some(StoreKind::InMemory));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn forget_absent_key_is_noop() {
        let mut index = KeyIndex::new();
        index.forget("missing");
        assert!(index.is_empty());
    }

    #[test]
    fn keys_in_filters_by_owner() {
        let mut index = KeyIndex::new();
        index.record("a", StoreKind::SessionScoped);
        index.record("b", StoreKind::LocalPersistent);
        index.record("c", StoreKind::SessionScoped);

        let mut session_keys = index.keys_in(StoreKind::SessionScoped);
        session_keys.sort();
        assert_eq!(session_keys, vec!["a", "c"]);
        assert_eq!(index.keys_in(StoreKind::InMemory), Vec::<String>::new());
    }

    #[test]
    fn forget_all_empties_the_index() {
        let mut index = KeyIndex::new();
        index.record("a", StoreKind::SessionScoped);
        index.record("b", StoreKind::InMemory);
        index.forget_all();
        assert!(index.is_empty());
        assert_eq!(index.lookup("a"), None);
    }
}
