use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// In-process key-value store.
///
/// Reads and writes can be switched to fail, which lets callers exercise
/// their storage-failure paths without a broken disk.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn entries(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Storage(format!("read of '{}' failed", key)));
        }
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Storage(format!("write of '{}' failed", key)));
        }
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Storage(format!("remove of '{}' failed", key)));
        }
        self.entries()?.remove(key);
        Ok(())
    }

    fn update<T, F>(&self, key: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(Option<String>) -> StoreResult<(Option<String>, T)>,
    {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Storage(format!("read of '{}' failed", key)));
        }
        let mut entries = self.entries()?;
        let (next, result) = f(entries.get(key).cloned())?;
        if let Some(value) = next {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Storage(format!("write of '{}' failed", key)));
            }
            entries.insert(key.to_string(), value);
        }
        Ok(result)
    }
}
