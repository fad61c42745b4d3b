//! Key-value storage capability.
//!
//! The todo engine persists through a minimal string-keyed store: one `get`
//! and one `set`. Browsers expose exactly this shape as local storage; the
//! workspace ships a file-backed implementation and an in-memory one for tests.

use thiserror::Error;

/// Errors raised by a storage backend
///
/// Only the backend being unavailable or refusing a write is an error.
/// A missing key is `Ok(None)`, never an error.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend cannot be reached or is disabled
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write because it would exceed its quota
    #[error("Storage quota exceeded writing {bytes} bytes to '{key}'")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Size of the rejected value
        bytes: usize,
    },

    /// Underlying I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string-keyed, string-valued storage capability
///
/// Implementations must make a successful `set` visible to every later `get`
/// on the same instance.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if the key is absent
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_error_names_key_and_size() {
        let error = StorageError::QuotaExceeded {
            key: "next-todo-list".to_string(),
            bytes: 5_242_881,
        };
        let message = error.to_string();
        assert!(message.contains("next-todo-list"));
        assert!(message.contains("5242881"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: StorageError = io.into();
        assert!(matches!(error, StorageError::Io(_)));
    }
}
