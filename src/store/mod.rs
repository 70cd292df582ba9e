//! Backend stores.
//!
//! Each store implements the fixed [`CacheStore`] contract against one
//! physical medium. The facade is the only caller; client code never
//! touches a store directly. Stores own their medium exclusively and keep
//! their internal bookkeeping (tags, expiry, key prefixing) to themselves —
//! the routing layer sees only "a value" or "nothing".

mod entry;
mod local;
mod memory;
mod session;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use session::SessionStore;

use crate::error::Result;
use crate::types::EntryOptions;
use crate::value::Value;
use std::collections::HashMap;

/// The per-store contract consumed by the facade.
///
/// All operations take `&self`; implementations use interior mutability.
/// A store is free to fail on its medium (I/O, serialization) — such
/// errors propagate through the facade unchanged.
pub trait CacheStore {
    /// Store `value` under `key`, overwriting any prior entry. `options`
    /// may attach a tag and expiry; both are store-internal bookkeeping.
    fn set(&self, key: &str, value: Value, options: &EntryOptions) -> Result<()>;

    /// Read the live value for `key`. Missing and expired entries both
    /// read as `None`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Remove the entry for `key`. No-op when absent.
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every entry in this store.
    fn remove_all(&self) -> Result<()>;

    /// Live entries carrying `tag`, keyed by logical key. Empty when none.
    fn get_tag_data(&self, tag: &str) -> Result<HashMap<String, Value>>;

    /// Remove every entry carrying `tag`.
    fn remove_tag(&self, tag: &str) -> Result<()>;

    /// Set the prefix this store applies to all keys it manages
    /// internally, affecting future writes and reads.
    fn set_global_prefix(&self, prefix: &str) -> Result<()>;
}
