//! Chat list derived from the message log.
//!
//! Recomputed from the full log on every call. Nothing is cached, so the
//! result is a pure function of the log and the viewing user.

use std::collections::HashMap;
use tracing::debug;

use crate::error::StoreResult;
use crate::kv::KeyValueStore;
use crate::models::{Chat, Message};
use crate::store::MessageStore;

/// Build one [`Chat`] per `(counterparty, job)` thread the user takes part in,
/// most recent thread first.
///
/// A later message replaces `last_message` only when its timestamp is strictly
/// greater, so on a tie the first one in log order wins. Threads whose last
/// messages share a timestamp keep the order in which they were first seen.
pub fn aggregate_chats(messages: &[Message], user_id: &str) -> Vec<Chat> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut chats: Vec<Chat> = Vec::new();

    for message in messages.iter().filter(|m| m.involves(user_id)) {
        let counterparty = message.counterparty(user_id);
        let unread = u32::from(message.is_unread_for(user_id));

        let key = (counterparty, message.job_id.as_str());
        match index.get(&key).copied() {
            Some(i) => {
                let chat = &mut chats[i];
                if message.timestamp > chat.last_message.timestamp {
                    chat.last_message = message.clone();
                }
                chat.unread_count += unread;
            }
            None => {
                index.insert(key, chats.len());
                chats.push(Chat {
                    counterparty_id: counterparty.to_string(),
                    job_id: message.job_id.clone(),
                    last_message: message.clone(),
                    unread_count: unread,
                });
            }
        }
    }

    // Stable: equal timestamps stay in first-seen order
    chats.sort_by(|a, b| b.last_message.timestamp.cmp(&a.last_message.timestamp));
    chats
}

impl<K: KeyValueStore> MessageStore<K> {
    /// The chat list for `user_id`. Read-only.
    pub fn get_chats(&self, user_id: &str) -> StoreResult<Vec<Chat>> {
        let messages = self.get_messages()?;
        let chats = aggregate_chats(&messages, user_id);
        debug!("Derived {} chats for {}", chats.len(), user_id);
        Ok(chats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, job: &str, from: &str, to: &str, ts: i64, read: bool) -> Message {
        Message {
            id: id.to_string(),
            job_id: job.to_string(),
            sender_id: from.to_string(),
            receiver_id: to.to_string(),
            content: format!("content of {}", id),
            read,
            timestamp: ts,
        }
    }

    #[test]
    fn test_no_messages() {
        assert!(aggregate_chats(&[], "A").is_empty());
    }

    #[test]
    fn test_ignores_threads_user_is_not_in() {
        let log = vec![msg("1", "J1", "B", "C", 1, false)];
        assert!(aggregate_chats(&log, "A").is_empty());
    }

    #[test]
    fn test_groups_by_counterparty_and_job() {
        let log = vec![
            msg("1", "J1", "A", "B", 1, false),
            msg("2", "J1", "B", "A", 2, false),
            msg("3", "J2", "B", "A", 3, false),
            msg("4", "J1", "C", "A", 4, false),
        ];
        let chats = aggregate_chats(&log, "A");

        let keys: Vec<(&str, &str)> = chats
            .iter()
            .map(|c| (c.counterparty_id.as_str(), c.job_id.as_str()))
            .collect();
        assert_eq!(keys, vec![("C", "J1"), ("B", "J2"), ("B", "J1")]);
        assert_eq!(chats[2].last_message.id, "2");
    }

    #[test]
    fn test_unread_counts_only_messages_to_viewer() {
        let log = vec![
            msg("1", "J1", "A", "B", 1, false),
            msg("2", "J1", "B", "A", 2, false),
            msg("3", "J1", "B", "A", 3, true),
            msg("4", "J1", "B", "A", 4, false),
        ];
        assert_eq!(aggregate_chats(&log, "A")[0].unread_count, 2);
        assert_eq!(aggregate_chats(&log, "B")[0].unread_count, 1);
    }

    #[test]
    fn test_first_message_initializes_unread() {
        // First message of the group is the unread one
        let log = vec![
            msg("1", "J1", "B", "A", 1, false),
            msg("2", "J1", "A", "B", 2, false),
        ];
        assert_eq!(aggregate_chats(&log, "A")[0].unread_count, 1);
    }

    #[test]
    fn test_last_message_tie_keeps_first_seen() {
        let log = vec![
            msg("1", "J1", "A", "B", 5, false),
            msg("2", "J1", "B", "A", 5, false),
        ];
        assert_eq!(aggregate_chats(&log, "A")[0].last_message.id, "1");
    }

    #[test]
    fn test_last_message_uses_max_timestamp_not_log_order() {
        let log = vec![
            msg("1", "J1", "A", "B", 9, false),
            msg("2", "J1", "B", "A", 3, false),
        ];
        assert_eq!(aggregate_chats(&log, "A")[0].last_message.id, "1");
    }

    #[test]
    fn test_equal_thread_timestamps_keep_first_seen_order() {
        let log = vec![
            msg("1", "J1", "B", "A", 7, false),
            msg("2", "J2", "C", "A", 7, false),
        ];
        let chats = aggregate_chats(&log, "A");
        assert_eq!(chats[0].job_id, "J1");
        assert_eq!(chats[1].job_id, "J2");
    }

    #[test]
    fn test_self_addressed_message() {
        // Counterparty of a note to self is the user
        let log = vec![msg("1", "J1", "A", "A", 1, false)];
        let chats = aggregate_chats(&log, "A");
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].counterparty_id, "A");
        assert_eq!(chats[0].unread_count, 1);
    }

    #[test]
    fn test_recompute_is_identical() {
        let log = vec![
            msg("1", "J1", "A", "B", 1, false),
            msg("2", "J2", "C", "A", 2, false),
        ];
        assert_eq!(aggregate_chats(&log, "A"), aggregate_chats(&log, "A"));
    }
}
