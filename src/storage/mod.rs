pub mod json_backend;
pub mod memory;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::Result;

/// String key-value persistence for one preference namespace.
///
/// Implementations only move strings; encoding belongs to the caller.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Discards cached state so the next `get` observes writes made by
    /// other handles on the same namespace.
    fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn refresh(&self) -> Result<()> {
        (**self).refresh()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn refresh(&self) -> Result<()> {
        (**self).refresh()
    }
}

/// Reads and decodes a JSON value stored under `key`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`, replacing any previous value.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.put(key, &json)
}

pub use json_backend::{JsonFileStore, JsonStorage};
pub use memory::MemoryStore;
