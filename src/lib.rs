//! # Stowage
//!
//! Reactive values persisted to key-value storage.
//!
//! ## Persisted values
//!
//! - `Persisted<T, S>` - a value loaded from a storage key (or seeded with a
//!   default), written back as JSON on every `set`/`update`, then announced to
//!   its `on_change` callback and subscribers
//! - `Storage` - the string-keyed backend trait, with in-memory, file and
//!   browser `localStorage` implementations
//!
//! ## VIP list
//!
//! - `VipListState` - the list of VIP names kept under the `"vips"` key, with
//!   a built-in default list and a text rendering
//!
//! ```
//! use std::sync::Arc;
//! use stowage::{MemoryStorage, VipListState};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let vips = VipListState::new(storage).unwrap();
//! vips.load_default_names().unwrap();
//! assert!(vips.generate_formatted_list().starts_with("# Vip list"));
//! ```

pub mod error;
pub mod persisted;
pub mod storage;
pub mod vip;

// Re-export main types for convenience
pub use error::{Error, Result, StorageError};
pub use persisted::{Persisted, PersistedBuilder};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use vip::{format_vip_list, VipListState};
