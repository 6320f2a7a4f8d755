//! Local key-value persistence.
//!
//! The stores only ever need "get/set a string by key". Backends decide where
//! the strings live.

mod memory;
mod sqlite;

pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

use crate::error::StoreResult;

/// String-valued key-value storage on the device.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing has been stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Atomic read-modify-write of one key.
    ///
    /// `f` receives the current value and returns the value to write back
    /// (`None` leaves the key untouched) plus a result for the caller. No
    /// other writer, in this process or another one sharing the backend, can
    /// change the key between the read and the write. If `f` fails nothing is
    /// written.
    fn update<T, F>(&self, key: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(Option<String>) -> StoreResult<(Option<String>, T)>;
}

impl<K: KeyValueStore> KeyValueStore for std::sync::Arc<K> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn update<T, F>(&self, key: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(Option<String>) -> StoreResult<(Option<String>, T)>,
    {
        (**self).update(key, f)
    }
}
