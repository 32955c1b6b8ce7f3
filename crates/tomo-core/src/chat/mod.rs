//! Conversation domain types and the chat service seam.

pub mod message;
pub mod service;
pub mod session;

pub use message::{ChatMessage, Citation, MessageRole};
pub use service::{ChatReply, ChatService};
pub use session::ChatSession;
