//! Input DTOs with garde validation.
//!
//! Malformed records are rejected here, before anything touches storage.

use garde::Validate;
use serde::Deserialize;

use crate::error::StoreError;

/// Validation constants
const MAX_ID_LENGTH: usize = 128;
const MAX_CONTENT_LENGTH: usize = 10000;

/// Content must carry at least one visible character
fn validate_content(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("Message content cannot be blank"));
    }
    Ok(())
}

/// Input for saving a new message
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[garde(context(()))]
pub struct SaveMessageInput {
    #[garde(length(min = 1, max = MAX_ID_LENGTH))]
    pub job_id: String,
    #[garde(length(min = 1, max = MAX_ID_LENGTH))]
    pub sender_id: String,
    #[garde(length(min = 1, max = MAX_ID_LENGTH))]
    pub receiver_id: String,
    #[garde(length(min = 1, max = MAX_CONTENT_LENGTH), custom(validate_content))]
    pub content: String,
    #[garde(skip)]
    #[serde(default)]
    pub read: bool,
}

impl SaveMessageInput {
    /// A new, unread message.
    pub fn new(
        job_id: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            content: content.into(),
            read: false,
        }
    }
}

/// Helper trait to convert garde validation errors to StoreError
pub trait ValidateExt {
    fn validate_input(&self) -> Result<(), StoreError>;
}

impl<T: Validate<Context = ()>> ValidateExt for T {
    fn validate_input(&self) -> Result<(), StoreError> {
        self.validate()
            .map_err(|e| StoreError::Validation(e.to_string()))
    }
}
