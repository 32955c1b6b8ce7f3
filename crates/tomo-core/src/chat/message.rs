//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles, citations, and the message content itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TomoError};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant.
    Assistant,
}

impl MessageRole {
    /// Maps the server's two-valued wire enum onto the internal role.
    ///
    /// The mapping is total over the known values (`"user"`, `"model"`);
    /// an unrecognized value is a hard decode error, never a silent
    /// default.
    pub fn from_wire(value: &str) -> Result<Self> {
        match value {
            "user" => Ok(Self::User),
            "model" => Ok(Self::Assistant),
            other => Err(TomoError::decode(format!(
                "unknown message role '{other}'"
            ))),
        }
    }
}

/// A source citation attached to an assistant message.
///
/// Currently always empty at creation - the service does not yet return
/// structured citations - but the shape round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub id: i64,
    pub source: String,
    pub detail: String,
}

/// A single message in a conversation.
///
/// Server-loaded messages carry the server's id; locally appended
/// (optimistic) messages carry a temporary id derived from the clock and
/// are never reconciled against a server id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub text: String,
    pub citations: Vec<Citation>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates an optimistic user message with a clock-derived local id.
    pub fn user(text: impl Into<String>) -> Self {
        Self::local(MessageRole::User, text)
    }

    /// Creates an assistant message from a send response. Citations are
    /// empty until the service serves structured citation data.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::local(MessageRole::Assistant, text)
    }

    fn local(role: MessageRole, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            role,
            text: text.into(),
            citations: Vec::new(),
            timestamp: now,
        }
    }
}
