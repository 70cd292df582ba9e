//! # cachemux
//!
//! Multiplexing cache facade over three interchangeable stores:
//! session-scoped, local-persistent, and plain process memory.
//!
//! Client code stores, retrieves, tags, and bulk-clears key/value pairs
//! without choosing a physical medium at every call site. A key index maps
//! each logical key to the one store that owns it, so a key never exists in
//! two stores at once; writing a key to a different store evicts it from
//! the old one first.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cachemux::prelude::*;
//!
//! // Local-persistent store backed by ./cache
//! let cache = CacheMux::open("./cache")?;
//!
//! cache.set("user:1", "Alice", StoreKind::LocalPersistent)?;
//! cache.set("draft", "unsaved text", StoreKind::SessionScoped)?;
//! cache.set("hot", 42, StoreKind::InMemory)?;
//!
//! let name = cache.get("user:1")?;
//!
//! // Tag a group of entries, purge them together
//! cache.set_with_options("u:1", 1, StoreKind::InMemory,
//!     EntryOptions::new().with_tag("users"))?;
//! cache.remove_tag("users", StoreKind::InMemory)?;
//!
//! // Per-store and global clears
//! cache.remove_all_in(StoreKind::SessionScoped)?;
//! cache.remove_all()?;
//! ```
//!
//! ## Routing
//!
//! Every operation first consults the key index, then delegates to exactly
//! one store — never by probing. Bulk tag operations and prefix
//! configuration delegate to the addressed store without touching the
//! index; tag membership and key namespacing are store-internal concerns.

#![warn(missing_docs)]

mod error;
mod index;
mod mux;
mod store;
mod types;
mod value;

pub mod prelude;

// Re-export main entry points
pub use mux::{CacheMux, CacheMuxBuilder};
pub use error::{Error, Result};

// Re-export the store contract and the concrete stores
pub use store::{CacheStore, LocalStore, MemoryStore, SessionStore};

// Re-export types
pub use types::{EntryOptions, StoreKind};
pub use value::Value;
