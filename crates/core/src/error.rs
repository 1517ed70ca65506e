//! Unified error types for wikicache.
//!
//! Every failure surfaced by the store, the remote source, or the cache maps
//! onto one of these variants. Display strings carry a stable code prefix.

use crate::config::ConfigError;

/// Unified error types for the revision-aware cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty resource title).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Requested store key is absent.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Transport or HTTP failure reaching the origin.
    #[error("REMOTE_UNAVAILABLE: {0}")]
    RemoteUnavailable(String),

    /// Origin response is missing expected fields.
    #[error("MALFORMED_RESPONSE: {0}")]
    MalformedResponse(String),

    /// Stored bytes are not valid under the expected text encoding.
    #[error("DECODE_ERROR: {key} is not valid {encoding}")]
    DecodeError { key: String, encoding: String },

    /// Any other object store failure.
    #[error("STORE_ERROR: {0}")]
    Store(String),

    /// Configuration could not be applied.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether retrying the whole operation could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::RemoteUnavailable(_) | Error::Store(_))
    }
}

impl From<object_store::Error> for Error {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => Error::NotFound(path),
            other => Error::Store(other.to_string()),
        }
    }
}
