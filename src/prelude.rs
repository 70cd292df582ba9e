//! Convenient imports for cachemux.
//!
//! This module re-exports the most commonly used types so you can get
//! started with a single import:
//!
//! ```ignore
//! use cachemux::prelude::*;
//!
//! let cache = CacheMux::ephemeral();
//! cache.set("key", "value", StoreKind::InMemory)?;
//! ```

// Main entry point
pub use crate::mux::{CacheMux, CacheMuxBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Routing and entry types
pub use crate::types::{EntryOptions, StoreKind};
pub use crate::value::Value;

// Re-export serde_json for convenience
pub use serde_json::json;
