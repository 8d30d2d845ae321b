//! Shared chat room: message ordering and day grouping, plus presence
//! tracking for the online-users sidebar.

mod grouping;
mod presence;

pub use grouping::{group_by_day, DayLabel};
pub use presence::{PresenceEntry, PresenceRoster, DEFAULT_PRESENCE_TTL};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profiles::{UserId, UserKind};

/// Hard cap on message length, enforced before any store write.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// One message in the global chat room. Append-only; ordering is established
/// at render time from the timestamp, never from arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub user_id: UserId,
    pub username: String,
    pub user_type: UserKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message text is empty")]
    EmptyMessage,
    #[error("message exceeds {MAX_MESSAGE_CHARS} characters ({found})")]
    MessageTooLong { found: usize },
}

/// Validate and trim outbound message text.
pub fn validate_text(text: &str) -> Result<String, ChatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    let chars = trimmed.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(ChatError::MessageTooLong { found: chars });
    }

    Ok(trimmed.to_string())
}
