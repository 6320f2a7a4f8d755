//! Session and settings records kept on the device.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use crate::models::{Session, Settings};

pub const SESSION_KEY: &str = "gigmate/session";
pub const SETTINGS_KEY: &str = "gigmate/settings";

pub struct SessionStore<K> {
    kv: K,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn save_session(&self, session: &Session) -> StoreResult<()> {
        self.write(SESSION_KEY, session)?;
        info!("Signed in as {} ({})", session.user_id, session.role);
        Ok(())
    }

    pub fn load_session(&self) -> StoreResult<Option<Session>> {
        self.read(SESSION_KEY)
    }

    /// Forget the signed-in user. Settings are kept.
    pub fn clear_session(&self) -> StoreResult<()> {
        self.kv.remove(SESSION_KEY)?;
        info!("Session cleared");
        Ok(())
    }

    /// Stored settings, or the defaults if none were saved yet.
    pub fn load_settings(&self) -> StoreResult<Settings> {
        Ok(self.read(SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        self.write(SETTINGS_KEY, settings)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.kv.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }
}
