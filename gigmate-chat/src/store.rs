//! Message store: the append-only message log in local key-value storage.
//!
//! The whole log lives under [`MESSAGES_KEY`] as a JSON array. Every
//! read-modify-write of that entry goes through [`KeyValueStore::update`], so
//! two concurrent sends (or a send racing a mark-as-read) cannot overwrite
//! each other's effect, even from separate store handles or processes
//! sharing one database file.

use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use crate::models::input::ValidateExt;
use crate::models::{Message, SaveMessageInput};

/// Storage key holding the full message log.
pub const MESSAGES_KEY: &str = "gigmate/messages/all";

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

pub struct MessageStore<K> {
    kv: K,
    clock: Clock,
}

impl<K: KeyValueStore> MessageStore<K> {
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            clock: Box::new(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Replace the wall clock (epoch milliseconds) used to stamp new messages.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[cfg(test)]
    pub(crate) fn kv(&self) -> &K {
        &self.kv
    }

    /// Validate, stamp and append a message, then persist the log.
    pub fn save_message(&self, input: SaveMessageInput) -> StoreResult<Message> {
        if let Err(e) = input.validate_input() {
            warn!("Rejected message for job {}: {}", input.job_id, e);
            return Err(e);
        }

        let message = self.kv.update(MESSAGES_KEY, |raw| {
            let mut log = decode_log(raw)?;

            let mut timestamp = (self.clock)();
            // Appends are clamped, so the last entry carries the latest timestamp
            if let Some(latest) = log.last().map(|m| m.timestamp) {
                if timestamp < latest {
                    warn!(
                        "Clock went backwards ({} < {}), clamping message timestamp",
                        timestamp, latest
                    );
                    timestamp = latest;
                }
            }

            let message = Message {
                id: uuid::Uuid::new_v4().to_string(),
                job_id: input.job_id,
                sender_id: input.sender_id,
                receiver_id: input.receiver_id,
                content: input.content,
                read: input.read,
                timestamp,
            };
            log.push(message.clone());
            Ok((Some(serde_json::to_string(&log)?), message))
        })?;

        info!(
            "Saved message {} for job {} ({} -> {})",
            message.id, message.job_id, message.sender_id, message.receiver_id
        );
        Ok(message)
    }

    /// The full log in storage order.
    pub fn get_messages(&self) -> StoreResult<Vec<Message>> {
        decode_log(self.kv.get(MESSAGES_KEY)?)
    }

    /// Messages of one job, oldest first. Equal timestamps keep storage order.
    pub fn get_messages_by_job_id(&self, job_id: &str) -> StoreResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .get_messages()?
            .into_iter()
            .filter(|m| m.job_id == job_id)
            .collect();
        // sort_by_key is stable
        messages.sort_by_key(|m| m.timestamp);
        debug!("Loaded {} messages for job {}", messages.len(), job_id);
        Ok(messages)
    }

    /// Messages the user sent or received, in storage order.
    pub fn get_messages_by_user_id(&self, user_id: &str) -> StoreResult<Vec<Message>> {
        Ok(self
            .get_messages()?
            .into_iter()
            .filter(|m| m.involves(user_id))
            .collect())
    }

    /// Mark every unread message of `job_id` addressed to `user_id` as read.
    ///
    /// Returns how many messages changed. The log is only rewritten when that
    /// number is non-zero, so repeating the call is a no-op.
    pub fn mark_messages_as_read(&self, job_id: &str, user_id: &str) -> StoreResult<usize> {
        let marked = self.kv.update(MESSAGES_KEY, |raw| {
            let mut log = decode_log(raw)?;

            let mut marked = 0;
            for message in log
                .iter_mut()
                .filter(|m| m.job_id == job_id && m.is_unread_for(user_id))
            {
                message.read = true;
                marked += 1;
            }

            if marked == 0 {
                return Ok((None, 0));
            }
            Ok((Some(serde_json::to_string(&log)?), marked))
        })?;

        if marked > 0 {
            info!(
                "Marked {} messages as read for {} in job {}",
                marked, user_id, job_id
            );
        }
        Ok(marked)
    }
}

fn decode_log(raw: Option<String>) -> StoreResult<Vec<Message>> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: MESSAGES_KEY.to_string(),
            source,
        }),
    }
}
