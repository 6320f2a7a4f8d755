use serde::{Deserialize, Serialize};

use super::message::Message;

/// Summary of one conversation thread, keyed by counterparty and job.
/// Derived from the message log on every query, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
   pub counterparty_id: String,
   pub job_id: String,
   pub last_message: Message,
   pub unread_count: u32,
}
