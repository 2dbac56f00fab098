//! Reactive values backed by persistent storage.
//!
//! A [`Persisted`] owns one logical value: loaded from its storage key (or a
//! default), readable like a store, and written back to storage on every
//! mutation before callbacks and subscribers are notified.

mod persisted;

pub use persisted::{Persisted, PersistedBuilder};
