//! Public types for the cachemux API.
//!
//! [`StoreKind`] identifies one of the three backend stores, and
//! [`EntryOptions`] carries per-entry settings (tag, expiry) down to the
//! store that receives a write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifier for one of the three backend stores.
///
/// This is a closed set: routing dispatches by exhaustive match, so adding
/// a store is a compile-time-checked change. The original system normalized
/// unrecognized identifiers to its session store on writes; that policy
/// survives at the untyped boundary via [`StoreKind::from_name_or_default`]
/// and the `From<Option<StoreKind>>` conversion, while the typed API makes
/// invalid identifiers unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StoreKind {
    /// Session-scoped storage: lives exactly as long as the cache instance's
    /// session, never touches disk.
    #[default]
    SessionScoped,

    /// Local persistent storage: survives process restarts when the cache
    /// was opened with a backing path.
    LocalPersistent,

    /// Plain process-memory storage.
    InMemory,
}

impl StoreKind {
    /// Canonical name, as used in logs and persisted state.
    pub fn name(&self) -> &'static str {
        match self {
            StoreKind::SessionScoped => "session",
            StoreKind::LocalPersistent => "local",
            StoreKind::InMemory => "memory",
        }
    }

    /// Parse a canonical name.
    ///
    /// Returns `None` for anything unrecognized; use
    /// [`StoreKind::from_name_or_default`] for the write-path normalization
    /// policy instead.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "session" => Some(StoreKind::SessionScoped),
            "local" => Some(StoreKind::LocalPersistent),
            "memory" => Some(StoreKind::InMemory),
            _ => None,
        }
    }

    /// Parse a name, normalizing anything unrecognized to `SessionScoped`.
    ///
    /// This is the original write-path policy: an invalid store identifier
    /// on `set` is not an error, it routes to the session store.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    /// All three kinds, in routing order.
    pub fn all() -> [StoreKind; 3] {
        [
            StoreKind::SessionScoped,
            StoreKind::LocalPersistent,
            StoreKind::InMemory,
        ]
    }
}

impl From<Option<StoreKind>> for StoreKind {
    /// An omitted store identifier routes to the session store.
    fn from(kind: Option<StoreKind>) -> Self {
        kind.unwrap_or_default()
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-entry options passed through to the store at `set` time.
///
/// The facade never inspects these; they are store-internal settings.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
///
/// cache.set_with_options(
///     "user:1",
///     Value::Int(1),
///     StoreKind::InMemory,
///     EntryOptions::new().with_tag("users").with_max_age(Duration::from_secs(60)),
/// )?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryOptions {
    /// Opaque label grouping entries within one store for bulk operations.
    pub tag: Option<String>,

    /// Relative time-to-live, measured from the write.
    pub max_age: Option<Duration>,

    /// Absolute expiry instant; takes precedence over `max_age` when both
    /// are set.
    pub expires_at: Option<DateTime<Utc>>,
}

impl EntryOptions {
    /// Empty options: no tag, no expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set a relative time-to-live.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Set an absolute expiry instant.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Resolve the effective expiry instant relative to `now`.
    pub(crate) fn effective_expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(at) = self.expires_at {
            return Some(at);
        }
        self.max_age.map(|age| {
            chrono::Duration::from_std(age)
                .ok()
                .and_then(|age| now.checked_add_signed(age))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_name_normalizes_to_session() {
        assert_eq!(
            StoreKind::from_name_or_default("cloud"),
            StoreKind::SessionScoped
        );
        assert_eq!(StoreKind::from_name("cloud"), None);
    }

    #[test]
    fn omitted_kind_defaults_to_session() {
        assert_eq!(StoreKind::from(None), StoreKind::SessionScoped);
        assert_eq!(
            StoreKind::from(Some(StoreKind::InMemory)),
            StoreKind::InMemory
        );
    }

    #[test]
    fn names_round_trip() {
        for kind in StoreKind::all() {
            assert_eq!(StoreKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn absolute_expiry_wins_over_max_age() {
        let now = Utc::now();
        let at = now + chrono::Duration::hours(1);
        let options = EntryOptions::new()
            .with_max_age(Duration::from_secs(5))
            .with_expires_at(at);
        assert_eq!(options.effective_expiry(now), Some(at));
    }
}
