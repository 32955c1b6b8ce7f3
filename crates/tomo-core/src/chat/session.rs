//! Conversation summary domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-persisted conversation, as listed by the session directory.
///
/// Identity is server-assigned; the client never invents a session id. A
/// conversation that has not been persisted yet (a draft) is represented by
/// the *absence* of an id in the synchronizer, not by a sentinel value
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Opaque server-assigned id.
    pub id: String,
    /// Display title. The service does not store a separate title, so this
    /// mirrors the last message summary.
    pub title: String,
    /// Summary of the most recent message.
    pub last_message: String,
    /// Timestamp of the most recent activity.
    pub timestamp: DateTime<Utc>,
}
