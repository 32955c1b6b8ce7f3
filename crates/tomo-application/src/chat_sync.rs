//! Message synchronizer.
//!
//! Owns the active conversation id and the ordered message log, and
//! reconciles locally-optimistic message state with server-confirmed
//! state. All operations are tasks on one event loop; the only suspension
//! points are the network awaits, and between issuing a request and
//! resuming, the user may have switched conversations. Every resumption is
//! therefore fenced: it captures an epoch when the request is issued and
//! discards its result if the epoch moved underneath it. Stale results are
//! discarded, never erased from the network - a send that loses the fence
//! still persisted server-side.

use std::sync::Arc;

use tokio::sync::Mutex;

use tomo_core::chat::{ChatMessage, ChatReply, ChatService};
use tomo_core::error::Result;
use tomo_core::state::StateRepository;

struct SyncState {
    /// Active conversation, `None` while a draft (not yet persisted
    /// server-side) is being composed.
    active_session_id: Option<String>,
    /// Ordered, append-only message log for the active conversation.
    messages: Vec<ChatMessage>,
    /// A send is in flight. Callers disable the send affordance while
    /// pending; no debouncing happens here.
    pending: bool,
    /// Fence epoch, bumped by select/new/reset. A resumption whose
    /// captured epoch no longer matches must not mutate shared state.
    epoch: u64,
}

/// Synchronizes the active conversation's message log with the server.
///
/// Invariants:
/// - at most one conversation is active at a time;
/// - switching replaces the log wholesale, never merges;
/// - a draft gains an id only through the first successful send, and that
///   id is propagated outward via the state repository.
pub struct ChatSynchronizer {
    chat: Arc<dyn ChatService>,
    state_repository: Arc<dyn StateRepository>,
    inner: Mutex<SyncState>,
}

impl ChatSynchronizer {
    pub fn new(chat: Arc<dyn ChatService>, state_repository: Arc<dyn StateRepository>) -> Self {
        Self {
            chat,
            state_repository,
            inner: Mutex::new(SyncState {
                active_session_id: None,
                messages: Vec::new(),
                pending: false,
                epoch: 0,
            }),
        }
    }

    /// Returns a copy of the active conversation's message log.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.inner.lock().await.messages.clone()
    }

    /// Returns the active conversation id, `None` for a draft.
    pub async fn active_session_id(&self) -> Option<String> {
        self.inner.lock().await.active_session_id.clone()
    }

    /// Whether a send is in flight.
    pub async fn is_pending(&self) -> bool {
        self.inner.lock().await.pending
    }

    /// Switches to the given conversation, replacing the message log with
    /// its full server-side history.
    ///
    /// The fence is claimed *before* the fetch, so any pending send (and
    /// any older selection still in flight) is invalidated immediately; a
    /// failed fetch leaves the previous log visible but stale sends
    /// invalidated. The fetched history is applied only if no newer claim
    /// happened during the fetch.
    pub async fn select_session(&self, session_id: &str) -> Result<()> {
        let claim = {
            let mut state = self.inner.lock().await;
            state.epoch += 1;
            state.epoch
        };

        let history = self.chat.session_messages(session_id).await?;

        let applied = {
            let mut state = self.inner.lock().await;
            if state.epoch == claim {
                state.messages = history;
                state.active_session_id = Some(session_id.to_string());
                state.pending = false;
                true
            } else {
                false
            }
        };

        if applied {
            self.state_repository
                .set_active_session(session_id.to_string())
                .await?;
        } else {
            tracing::debug!(%session_id, "discarding superseded session selection");
        }

        Ok(())
    }

    /// Starts a fresh draft conversation: clears the log and the active
    /// id. Purely local; no network call.
    pub async fn new_session(&self) -> Result<()> {
        {
            let mut state = self.inner.lock().await;
            state.epoch += 1;
            state.active_session_id = None;
            state.messages.clear();
            state.pending = false;
        }
        self.state_repository.clear_active_session().await
    }

    /// Sends a message in the active conversation.
    ///
    /// The user message is appended optimistically before the request is
    /// issued. On success under an unchanged fence, a draft adopts the
    /// server-assigned session id (the sole mechanism by which a draft
    /// becomes persisted) and the assistant reply is appended with an
    /// empty citation list. On failure the optimistic message stays - the
    /// user's own text is not lost data - and the error is surfaced.
    pub async fn send(&self, text: &str) -> Result<()> {
        let (claim, issued_against) = {
            let mut state = self.inner.lock().await;
            state.messages.push(ChatMessage::user(text));
            state.pending = true;
            (state.epoch, state.active_session_id.clone())
        };

        match self.chat.send_message(text, issued_against.as_deref()).await {
            Ok(ChatReply {
                response,
                session_id,
            }) => {
                let adopted = {
                    let mut state = self.inner.lock().await;
                    if state.epoch != claim {
                        tracing::debug!(
                            %session_id,
                            "discarding send result for a superseded conversation"
                        );
                        return Ok(());
                    }
                    let adopted = if state.active_session_id.is_none() {
                        state.active_session_id = Some(session_id.clone());
                        true
                    } else {
                        false
                    };
                    state.messages.push(ChatMessage::assistant(response));
                    state.pending = false;
                    adopted
                };

                if adopted {
                    self.state_repository.set_active_session(session_id).await?;
                }
                Ok(())
            }
            Err(err) => {
                let mut state = self.inner.lock().await;
                if state.epoch == claim {
                    state.pending = false;
                }
                Err(err)
            }
        }
    }

    /// Restores the persisted active conversation on startup, if any.
    pub async fn restore_last_session(&self) -> Result<Option<String>> {
        match self.state_repository.get_active_session().await {
            Some(session_id) => {
                self.select_session(&session_id).await?;
                Ok(Some(session_id))
            }
            None => Ok(None),
        }
    }

    /// Resets to an empty, draft-less state. Used by the credential-expiry
    /// path; safe to call repeatedly.
    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        state.epoch += 1;
        state.active_session_id = None;
        state.messages.clear();
        state.pending = false;
    }
}

#[cfg(test)]
#[path = "chat_sync_test.rs"]
mod tests;
