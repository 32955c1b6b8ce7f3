//! Top-level application controller.
//!
//! Composes the auth service, the persisted state, the message
//! synchronizer, the session directory, and the document registry, and
//! owns the single reaction to credential expiry: whichever in-flight
//! request discovers a 401 first (or second, or third - the reset is
//! idempotent) drops every component back to an empty, unauthenticated
//! state and routes the UI to the login screen.

use std::sync::Arc;

use tokio::sync::Mutex;

use tomo_api::ApiClient;
use tomo_core::auth::AuthService;
use tomo_core::chat::{ChatMessage, ChatService, ChatSession};
use tomo_core::document::{Document, DocumentDownload, DocumentService};
use tomo_core::error::Result;
use tomo_core::state::StateRepository;
use tomo_core::user::UserInfo;

use crate::chat_sync::ChatSynchronizer;
use crate::document_registry::DocumentRegistry;
use crate::session_directory::SessionDirectory;

/// Which top-level view the client shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Workspace,
}

/// The client's top-level state machine.
pub struct AppController {
    auth: Arc<dyn AuthService>,
    state_repository: Arc<dyn StateRepository>,
    chat: Arc<ChatSynchronizer>,
    directory: Arc<SessionDirectory>,
    documents: Arc<DocumentRegistry>,
    screen: Mutex<Screen>,
    current_user: Mutex<Option<UserInfo>>,
}

impl AppController {
    pub fn new(
        auth: Arc<dyn AuthService>,
        state_repository: Arc<dyn StateRepository>,
        chat_service: Arc<dyn ChatService>,
        document_service: Arc<dyn DocumentService>,
    ) -> Arc<Self> {
        Arc::new(Self {
            auth,
            state_repository: state_repository.clone(),
            chat: Arc::new(ChatSynchronizer::new(
                chat_service.clone(),
                state_repository,
            )),
            directory: Arc::new(SessionDirectory::new(chat_service)),
            documents: Arc::new(DocumentRegistry::new(document_service)),
            screen: Mutex::new(Screen::Login),
            current_user: Mutex::new(None),
        })
    }

    /// Installs this controller as the request layer's unauthorized
    /// observer. One slot, last writer wins; installing again replaces the
    /// previous registration.
    pub fn attach_to(self: &Arc<Self>, client: &ApiClient) {
        let controller = self.clone();
        client.set_on_unauthorized(move || {
            let controller = controller.clone();
            Box::pin(async move { controller.handle_unauthorized().await })
        });
    }

    /// The single reaction to credential expiry. Safe to run repeatedly:
    /// several in-flight requests may each discover the same 401.
    pub async fn handle_unauthorized(&self) {
        tracing::info!("credential expired; resetting to the login screen");
        if let Err(err) = self.state_repository.clear_credential().await {
            tracing::warn!(%err, "failed to clear credential");
        }
        if let Err(err) = self.state_repository.clear_active_session().await {
            tracing::warn!(%err, "failed to clear persisted session id");
        }
        self.chat.reset().await;
        self.directory.clear().await;
        self.documents.clear().await;
        *self.current_user.lock().await = None;
        *self.screen.lock().await = Screen::Login;
    }

    /// Current top-level view.
    pub async fn screen(&self) -> Screen {
        *self.screen.lock().await
    }

    /// The loaded account record, if any.
    pub async fn current_user(&self) -> Option<UserInfo> {
        self.current_user.lock().await.clone()
    }

    /// Entry point on process start: routes to the workspace when a
    /// credential is stored and loads its contents. Individual load
    /// failures are logged, not fatal - a 401 anywhere in here resets to
    /// the login screen through the usual path.
    pub async fn startup(&self) -> Result<Screen> {
        if !self.auth.is_authenticated().await {
            *self.screen.lock().await = Screen::Login;
            return Ok(Screen::Login);
        }

        *self.screen.lock().await = Screen::Workspace;
        self.enter_workspace().await;
        Ok(self.screen().await)
    }

    /// Logs in and enters the workspace.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.auth.login(username, password).await?;
        *self.screen.lock().await = Screen::Workspace;
        self.enter_workspace().await;
        Ok(())
    }

    async fn enter_workspace(&self) {
        match self.auth.current_user().await {
            Ok(user) => *self.current_user.lock().await = Some(user),
            Err(err) => tracing::warn!(%err, "failed to load current user"),
        }
        if let Err(err) = self.documents.refresh().await {
            tracing::warn!(%err, "failed to load documents");
        }
        if let Err(err) = self.directory.refresh().await {
            tracing::warn!(%err, "failed to load sessions");
        }
        if let Err(err) = self.chat.restore_last_session().await {
            tracing::warn!(%err, "failed to restore last session");
        }
    }

    /// Explicit logout: clears everything locally. No server call.
    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await?;
        self.state_repository.clear_active_session().await?;
        self.chat.reset().await;
        self.directory.clear().await;
        self.documents.clear().await;
        *self.current_user.lock().await = None;
        *self.screen.lock().await = Screen::Login;
        Ok(())
    }

    /// Sends a message in the active conversation. When the send persists
    /// a draft (the active id changes), the session directory is
    /// re-fetched so the new conversation appears in it.
    pub async fn send(&self, text: &str) -> Result<()> {
        let before = self.chat.active_session_id().await;
        self.chat.send(text).await?;
        if self.chat.active_session_id().await != before {
            self.refresh_directory().await;
        }
        Ok(())
    }

    /// Switches the active conversation and re-fetches the directory.
    pub async fn select_session(&self, session_id: &str) -> Result<()> {
        self.chat.select_session(session_id).await?;
        self.refresh_directory().await;
        Ok(())
    }

    /// Starts a fresh draft conversation.
    pub async fn new_session(&self) -> Result<()> {
        self.chat.new_session().await
    }

    /// Deletes a conversation; deleting the active one falls back to a
    /// fresh draft.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.directory.delete(session_id).await?;
        if self.chat.active_session_id().await.as_deref() == Some(session_id) {
            self.chat.new_session().await?;
        }
        Ok(())
    }

    async fn refresh_directory(&self) {
        if let Err(err) = self.directory.refresh().await {
            tracing::warn!(%err, "failed to refresh session directory");
        }
    }

    /// Messages of the active conversation.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.chat.messages().await
    }

    /// Active conversation id, `None` for a draft.
    pub async fn active_session_id(&self) -> Option<String> {
        self.chat.active_session_id().await
    }

    /// Cached session list.
    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.directory.sessions().await
    }

    /// Re-fetches the session list.
    pub async fn refresh_sessions(&self) -> Result<Vec<ChatSession>> {
        self.directory.refresh().await
    }

    /// Cached document list.
    pub async fn documents(&self) -> Vec<Document> {
        self.documents.documents().await
    }

    /// Re-fetches the document list.
    pub async fn refresh_documents(&self) -> Result<Vec<Document>> {
        self.documents.refresh().await
    }

    /// Uploads a document.
    pub async fn upload_document(&self, bytes: Vec<u8>, file_name: &str) -> Result<Document> {
        self.documents.upload(bytes, file_name).await
    }

    /// Deletes a document (server-confirmed).
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        self.documents.delete(document_id).await
    }

    /// Fetches a document record plus its download URL.
    pub async fn fetch_document(&self, document_id: &str) -> Result<DocumentDownload> {
        self.documents.fetch(document_id).await
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
