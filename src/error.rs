use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while opening or mutating a persisted value.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage key must not be empty")]
    EmptyKey,

    #[error("failed to deserialize value stored at `{key}`")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize value for `{key}`")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage failure for `{key}`")]
    Storage {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl Error {
    pub(crate) fn storage(key: &str, source: StorageError) -> Self {
        Error::Storage {
            key: key.to_string(),
            source,
        }
    }
}

/// Failures reported by a [`Storage`](crate::storage::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded while writing `{key}`")]
    QuotaExceeded { key: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("storage file {path} is corrupted")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Classify a rejected browser storage write by its `DOMException` name.
    /// Only quota errors become [`StorageError::QuotaExceeded`].
    pub fn from_dom_exception(key: &str, name: Option<&str>, detail: &str) -> Self {
        match name {
            // Firefox used its own name before standardizing
            Some("QuotaExceededError") | Some("NS_ERROR_DOM_QUOTA_REACHED") => {
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                }
            }
            Some(name) => StorageError::Unavailable(format!("{name}: {detail}")),
            None => StorageError::Unavailable(detail.to_string()),
        }
    }
}
