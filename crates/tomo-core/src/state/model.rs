//! Client state domain model.
//!
//! Contains the application-level state that persists across restarts.

use serde::{Deserialize, Serialize};

use crate::credential::Credential;

/// Client state that persists across restarts.
///
/// # Fields
///
/// * `credential` - The stored access credential. `None` means the client
///   is not authenticated and the UI routes to the login screen.
/// * `active_session_id` - The id of the active conversation, written
///   whenever it changes and removed on new-chat/logout. `None` while a
///   draft conversation (not yet persisted server-side) is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClientState {
    /// Id of the active conversation, if one is persisted server-side.
    ///
    /// Kept ahead of `credential` so the TOML serializer emits the plain
    /// value before the credential table.
    pub active_session_id: Option<String>,

    /// Stored access credential, if any.
    pub credential: Option<Credential>,
}

impl ClientState {
    /// Creates an empty (unauthenticated) client state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a credential is stored.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}
