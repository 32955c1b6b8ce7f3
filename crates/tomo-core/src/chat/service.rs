//! Chat service trait.
//!
//! Defines the interface to the conversation endpoints, decoupling the
//! synchronizer and the session directory from the HTTP implementation.

use async_trait::async_trait;

use crate::chat::message::ChatMessage;
use crate::chat::session::ChatSession;
use crate::error::Result;

/// The server's answer to a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Assistant response text.
    pub response: String,
    /// The session the exchange was persisted under. For a send issued
    /// against a draft this is the newly assigned id.
    pub session_id: String,
}

/// An abstract client for the conversation endpoints.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Sends a message, optionally into an existing session. `None` asks
    /// the server to open a new one and return its id.
    async fn send_message(&self, message: &str, session_id: Option<&str>) -> Result<ChatReply>;

    /// Lists the user's sessions in server order.
    async fn list_sessions(&self) -> Result<Vec<ChatSession>>;

    /// Fetches the full message history of one session.
    async fn session_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>>;

    /// Deletes a session server-side.
    async fn delete_session(&self, session_id: &str) -> Result<()>;
}
