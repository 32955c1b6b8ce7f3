//! Session directory.
//!
//! Keeps the list of known conversations for the current user. The list is
//! re-fetched wholesale whenever the active conversation changes - trading
//! efficiency for simplicity and guaranteed freshness - and is never
//! patched incrementally.

use std::sync::Arc;

use tokio::sync::Mutex;

use tomo_core::chat::{ChatService, ChatSession};
use tomo_core::error::Result;

/// Cached, server-ordered list of the user's conversations.
pub struct SessionDirectory {
    chat: Arc<dyn ChatService>,
    sessions: Mutex<Vec<ChatSession>>,
}

impl SessionDirectory {
    pub fn new(chat: Arc<dyn ChatService>) -> Self {
        Self {
            chat,
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Returns the cached list (server order preserved).
    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.sessions.lock().await.clone()
    }

    /// Re-fetches the list from the server, replacing the cache. A failed
    /// fetch leaves the previous cache untouched.
    pub async fn refresh(&self) -> Result<Vec<ChatSession>> {
        let listed = self.chat.list_sessions().await?;
        *self.sessions.lock().await = listed.clone();
        Ok(listed)
    }

    /// Deletes a conversation. The server is asked first; only a confirmed
    /// delete removes the item from the cache. Failure leaves the list
    /// unchanged and surfaces the error.
    pub async fn delete(&self, session_id: &str) -> Result<()> {
        self.chat.delete_session(session_id).await?;
        self.sessions
            .lock()
            .await
            .retain(|session| session.id != session_id);
        Ok(())
    }

    /// Empties the cache. Used by the credential-expiry path.
    pub async fn clear(&self) {
        self.sessions.lock().await.clear();
    }
}
