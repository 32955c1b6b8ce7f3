//! State repository trait.

use async_trait::async_trait;

use crate::credential::Credential;
use crate::error::Result;
use crate::state::model::ClientState;

/// Repository for the persisted client state.
///
/// Process-wide singleton mutated only by the request layer (credential
/// clearing on 401), by explicit login/logout, and by the message
/// synchronizer (active session id). There is no true parallelism in the
/// client, only interleaved suspension, so implementations need interior
/// mutability but no cross-process coordination beyond the state file.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Saves the whole client state to storage.
    async fn save_state(&self, state: ClientState) -> Result<()>;

    async fn get_state(&self) -> Result<ClientState>;

    async fn get_credential(&self) -> Option<Credential>;

    async fn set_credential(&self, credential: Credential) -> Result<()>;

    async fn clear_credential(&self) -> Result<()>;

    async fn has_credential(&self) -> bool;

    async fn get_active_session(&self) -> Option<String>;

    async fn set_active_session(&self, session_id: String) -> Result<()>;

    async fn clear_active_session(&self) -> Result<()>;
}
