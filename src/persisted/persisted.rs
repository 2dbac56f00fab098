use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::storage::Storage;

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Callback = Arc<dyn Fn() + Send + Sync>;

/// A reactive value mirrored into a key-value store.
///
/// The value is loaded from `key` when opened (or seeded with a default when
/// the entry is absent) and written back as JSON on every mutation, before any
/// callback runs. Clones are handles to the same cell.
pub struct Persisted<T, S> {
    key: Arc<str>,
    storage: Arc<S>,
    state: Arc<RwLock<T>>,
    on_change: Option<Callback>,
    subscribers: Arc<RwLock<Vec<Subscriber<T>>>>,
}

impl<T, S> Persisted<T, S>
where
    T: Serialize + DeserializeOwned + Clone,
    S: Storage,
{
    /// Open the value stored at `key`, seeding it with `default` when the
    /// entry is absent.
    pub fn new(storage: S, key: impl Into<String>, default: T) -> Result<Self> {
        Self::builder(storage, key, default).open()
    }

    /// Like [`new`](Self::new), invoking `on_change` after every persisted
    /// mutation.
    pub fn with_on_change<F>(
        storage: S,
        key: impl Into<String>,
        default: T,
        on_change: F,
    ) -> Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::builder(storage, key, default)
            .on_change(on_change)
            .open()
    }

    /// Open the value at `key`, seeding it with `T::default()`.
    pub fn open_default(storage: S, key: impl Into<String>) -> Result<Self>
    where
        T: Default,
    {
        Self::new(storage, key, T::default())
    }

    pub fn builder(storage: S, key: impl Into<String>, default: T) -> PersistedBuilder<T, S> {
        PersistedBuilder {
            storage,
            key: key.into(),
            default,
            on_change: None,
        }
    }

    /// The storage key this value lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read the value with a function without cloning.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&*state)
    }

    /// Replace the value, persist it, then notify.
    ///
    /// Setting a value equal to the current one still writes and notifies.
    pub fn set(&self, new_value: T) -> Result<()> {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            write_entry(&*self.storage, &self.key, &new_value)?;
            *state = new_value.clone();
            new_value
        };
        self.notify(&snapshot);
        Ok(())
    }

    /// Mutate the value in place, persist it, then notify.
    ///
    /// The closure works on a copy; if persisting fails the current value is
    /// left as it was.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = state.clone();
            f(&mut next);
            write_entry(&*self.storage, &self.key, &next)?;
            *state = next.clone();
            next
        };
        self.notify(&snapshot);
        Ok(())
    }

    /// Mutate a copy of the value; persist and notify only when `f` returns
    /// `Some`. Returns what `f` returned.
    pub fn update_if<F, R>(&self, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut T) -> Option<R>,
    {
        let (snapshot, out) = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = state.clone();
            let Some(out) = f(&mut next) else {
                return Ok(None);
            };
            write_entry(&*self.storage, &self.key, &next)?;
            *state = next.clone();
            (next, out)
        };
        self.notify(&snapshot);
        Ok(Some(out))
    }

    /// Re-read the entry from storage, picking up writes made through another
    /// store handle. An absent entry is re-seeded with the current value.
    /// Does not notify.
    pub fn reload(&self) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match read_entry::<T, S>(&*self.storage, &self.key)? {
            Some(value) => {
                log::debug!("Reloaded `{}`", self.key);
                *state = value;
            }
            None => write_entry(&*self.storage, &self.key, &*state)?,
        }
        Ok(())
    }

    /// Subscribe to changes.
    ///
    /// Subscribers receive the new value after it has been persisted and after
    /// the `on_change` callback has run.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    /// Run callbacks with the value committed by this mutation. No lock is
    /// held while they run, so they may mutate or subscribe to this cell.
    fn notify(&self, value: &T) {
        if let Some(on_change) = &self.on_change {
            on_change();
        }
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for subscriber in &subscribers {
            subscriber(value);
        }
    }
}

impl<T, S> Clone for Persisted<T, S> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            storage: Arc::clone(&self.storage),
            state: Arc::clone(&self.state),
            on_change: self.on_change.clone(),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for Persisted<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("value", &*state)
            .finish_non_exhaustive()
    }
}

/// Options for opening a [`Persisted`] value.
pub struct PersistedBuilder<T, S> {
    storage: S,
    key: String,
    default: T,
    on_change: Option<Callback>,
}

impl<T, S> PersistedBuilder<T, S>
where
    T: Serialize + DeserializeOwned + Clone,
    S: Storage,
{
    /// Callback run after every persisted mutation.
    pub fn on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(on_change));
        self
    }

    pub fn open(self) -> Result<Persisted<T, S>> {
        let PersistedBuilder {
            storage,
            key,
            default,
            on_change,
        } = self;

        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        let initial = match read_entry::<T, S>(&storage, &key)? {
            Some(value) => value,
            None => {
                write_entry(&storage, &key, &default)?;
                log::info!("Seeded `{}` with its default value", key);
                default
            }
        };

        Ok(Persisted {
            key: key.into(),
            storage: Arc::new(storage),
            state: Arc::new(RwLock::new(initial)),
            on_change,
            subscribers: Arc::new(RwLock::new(Vec::new())),
        })
    }
}

/// Read and decode the entry at `key`. An empty stored string counts as
/// absent.
fn read_entry<T, S>(storage: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let raw = storage.get_item(key).map_err(|e| {
        log::warn!("Failed to read `{}`: {}", key, e);
        Error::storage(key, e)
    })?;

    match raw {
        Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| {
                log::warn!("Stored value at `{}` is not readable: {}", key, source);
                Error::Deserialization {
                    key: key.to_string(),
                    source,
                }
            }),
        _ => Ok(None),
    }
}

fn write_entry<T, S>(storage: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: Storage + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| Error::Serialization {
        key: key.to_string(),
        source,
    })?;
    storage.set_item(key, &json).map_err(|e| {
        log::warn!("Failed to write `{}`: {}", key, e);
        Error::storage(key, e)
    })?;
    log::debug!("Persisted `{}` ({} bytes)", key, json.len());
    Ok(())
}
