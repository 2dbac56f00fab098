//! Key-value storage backends.
//!
//! A backend is a string-keyed, string-valued store. Values written through a
//! [`Persisted`](crate::Persisted) are whole-value overwrites; nothing here
//! does partial updates.
//!
//! - [`MemoryStorage`]: process-local map, used for tests and in-process state
//! - [`FileStorage`]: a JSON object on disk, survives restarts
//! - `LocalStorage`: browser `localStorage` (wasm32 only)

mod file;
#[cfg(target_arch = "wasm32")]
mod local;
mod memory;

use std::sync::Arc;

use crate::error::StorageError;

pub use file::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// A durable string-to-string store.
///
/// Persisted values are `Send + Sync` when their backend is.
pub trait Storage {
    /// Read the entry at `key`, `None` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the entry at `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the entry at `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}
