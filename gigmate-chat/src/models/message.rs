use serde::{Deserialize, Serialize};

/// One entry of the message log. Only `read` ever changes after creation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
   pub id: String,
   pub job_id: String,
   pub sender_id: String,
   pub receiver_id: String,
   pub content: String,
   pub read: bool,
   /// Unix epoch milliseconds, assigned by the store.
   pub timestamp: i64,
}

impl Message {
   pub fn involves(&self, user_id: &str) -> bool {
      self.sender_id == user_id || self.receiver_id == user_id
   }

   /// The other participant as seen by `viewer_id`.
   pub fn counterparty(&self, viewer_id: &str) -> &str {
      if self.receiver_id == viewer_id {
         &self.sender_id
      } else {
         &self.receiver_id
      }
   }

   pub fn is_unread_for(&self, user_id: &str) -> bool {
      self.receiver_id == user_id && !self.read
   }
}
