//! Unified error types for cachemux.
//!
//! The facade is a thin, fail-open router: it normalizes invalid *routing*
//! inputs but does not shield callers from underlying store failures. Every
//! store-level failure surfaces here unchanged.

use thiserror::Error;

/// All cachemux errors.
///
/// This is the canonical error type for all cache operations. Routing itself
/// never fails; errors originate in the backend stores (I/O on the
/// persistent store, serialization of values or persisted state).
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the local-persistent store's backing file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (value conversion or persisted state)
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Store-level error (invalid backing path, unusable state)
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for cachemux operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this is a serialization error.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Error::Serialization(_))
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
