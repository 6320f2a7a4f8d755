//! GigMate chat storage.
//!
//! An append-only message log kept in local key-value storage, the chat list
//! derived from it, and the session/settings records the app keeps on device.
//!
//! ## Modules
//!
//! - [`kv`] – key-value persistence capability and its backends
//! - [`models`] – Message, Chat, Session, Settings and validated inputs
//! - [`store`] – MessageStore
//! - [`chats`] – chat list aggregation
//! - [`session`] – SessionStore

mod chats;
mod error;
pub mod kv;
pub mod models;
mod session;
mod store;

pub use chats::aggregate_chats;
pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};
pub use models::{Chat, Message, Role, SaveMessageInput, Session, Settings};
pub use session::{SessionStore, SESSION_KEY, SETTINGS_KEY};
pub use store::{MessageStore, MESSAGES_KEY};
