use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// How long a writer waits for another connection's transaction to finish.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// SQLite-backed key-value store (one row per key).
///
/// Several handles (or processes) may open the same file; [`KeyValueStore::update`]
/// runs in an IMMEDIATE transaction so their read-modify-writes serialize.
pub struct SqliteKv(Mutex<Connection>);

impl SqliteKv {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let conn = Connection::open(path)?;
        debug!("Opened key-value database at {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(Self(Mutex::new(conn)))
    }

    fn conn(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.0.lock().map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            (key, value, now),
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }

    fn update<T, F>(&self, key: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(Option<String>) -> StoreResult<(Option<String>, T)>,
    {
        let mut conn = self.conn()?;
        // Takes the write lock up front; dropped without commit it rolls back
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<String> = tx
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;

        let (next, result) = f(current)?;
        if let Some(value) = next {
            let now = chrono::Utc::now().timestamp_millis();
            tx.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                (key, value.as_str(), now),
            )?;
        }
        tx.commit()?;
        Ok(result)
    }
}
