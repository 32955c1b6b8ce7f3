use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use tomo_api::ApiClient;
use tomo_core::TomoError;
use tomo_core::auth::AuthService;
use tomo_core::chat::{ChatMessage, ChatReply, ChatService, ChatSession, MessageRole};
use tomo_core::credential::Credential;
use tomo_core::document::{Document, DocumentDownload, DocumentKind, DocumentService, SyncStatus};
use tomo_core::state::{ClientState, StateRepository};
use tomo_core::user::UserInfo;

use super::{AppController, Screen};

/// In-memory state repository.
struct MockStateRepository {
    state: Mutex<ClientState>,
}

impl MockStateRepository {
    fn new() -> Self {
        Self {
            state: Mutex::new(ClientState::default()),
        }
    }
}

#[async_trait]
impl StateRepository for MockStateRepository {
    async fn save_state(&self, state: ClientState) -> tomo_core::Result<()> {
        *self.state.lock().unwrap() = state;
        Ok(())
    }

    async fn get_state(&self) -> tomo_core::Result<ClientState> {
        Ok(self.state.lock().unwrap().clone())
    }

    async fn get_credential(&self) -> Option<Credential> {
        self.state.lock().unwrap().credential.clone()
    }

    async fn set_credential(&self, credential: Credential) -> tomo_core::Result<()> {
        self.state.lock().unwrap().credential = Some(credential);
        Ok(())
    }

    async fn clear_credential(&self) -> tomo_core::Result<()> {
        self.state.lock().unwrap().credential = None;
        Ok(())
    }

    async fn has_credential(&self) -> bool {
        self.state.lock().unwrap().credential.is_some()
    }

    async fn get_active_session(&self) -> Option<String> {
        self.state.lock().unwrap().active_session_id.clone()
    }

    async fn set_active_session(&self, session_id: String) -> tomo_core::Result<()> {
        self.state.lock().unwrap().active_session_id = Some(session_id);
        Ok(())
    }

    async fn clear_active_session(&self) -> tomo_core::Result<()> {
        self.state.lock().unwrap().active_session_id = None;
        Ok(())
    }
}

/// Auth double writing the credential into the shared state repository,
/// exactly like the HTTP implementation does.
struct MockAuthService {
    state: Arc<MockStateRepository>,
    fail_login: AtomicBool,
}

impl MockAuthService {
    fn new(state: Arc<MockStateRepository>) -> Self {
        Self {
            state,
            fail_login: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, username: &str, _password: &str) -> tomo_core::Result<Credential> {
        if self.fail_login.load(Ordering::SeqCst) {
            return Err(TomoError::request_failed(
                401,
                "Incorrect username or password",
            ));
        }
        let credential = Credential::bearer(format!("token-for-{username}"));
        self.state.set_credential(credential.clone()).await?;
        Ok(credential)
    }

    async fn register(&self, email: &str, _password: &str) -> tomo_core::Result<UserInfo> {
        Ok(UserInfo {
            id: 1,
            email: email.to_string(),
            role: "user".to_string(),
            is_active: true,
        })
    }

    async fn current_user(&self) -> tomo_core::Result<UserInfo> {
        Ok(UserInfo {
            id: 1,
            email: "alice@example.com".to_string(),
            role: "user".to_string(),
            is_active: true,
        })
    }

    async fn logout(&self) -> tomo_core::Result<()> {
        self.state.clear_credential().await
    }

    async fn is_authenticated(&self) -> bool {
        self.state.has_credential().await
    }
}

/// Chat double: one scripted reply, per-session histories, a session list
/// that grows when a send persists a draft.
struct MockChatService {
    reply: ChatReply,
    histories: Mutex<HashMap<String, Vec<ChatMessage>>>,
    sessions: Mutex<Vec<ChatSession>>,
}

impl MockChatService {
    fn new(reply_text: &str, reply_session: &str) -> Self {
        Self {
            reply: ChatReply {
                response: reply_text.to_string(),
                session_id: reply_session.to_string(),
            },
            histories: Mutex::new(HashMap::new()),
            sessions: Mutex::new(Vec::new()),
        }
    }

    fn set_history(&self, session_id: &str, messages: Vec<ChatMessage>) {
        self.histories
            .lock()
            .unwrap()
            .insert(session_id.to_string(), messages);
    }
}

#[async_trait]
impl ChatService for MockChatService {
    async fn send_message(
        &self,
        message: &str,
        _session_id: Option<&str>,
    ) -> tomo_core::Result<ChatReply> {
        self.sessions.lock().unwrap().push(ChatSession {
            id: self.reply.session_id.clone(),
            title: message.to_string(),
            last_message: message.to_string(),
            timestamp: Utc::now(),
        });
        Ok(self.reply.clone())
    }

    async fn list_sessions(&self) -> tomo_core::Result<Vec<ChatSession>> {
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn session_messages(&self, session_id: &str) -> tomo_core::Result<Vec<ChatMessage>> {
        Ok(self
            .histories
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_session(&self, session_id: &str) -> tomo_core::Result<()> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|session| session.id != session_id);
        Ok(())
    }
}

struct MockDocumentService {
    stored: Mutex<Vec<Document>>,
}

impl MockDocumentService {
    fn new() -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DocumentService for MockDocumentService {
    async fn list(&self) -> tomo_core::Result<Vec<Document>> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn upload(&self, _bytes: Vec<u8>, file_name: &str) -> tomo_core::Result<Document> {
        let document = Document {
            id: format!("{}", self.stored.lock().unwrap().len() + 1),
            name: file_name.to_string(),
            kind: DocumentKind::from_filename(file_name),
            sync_status: SyncStatus::Synced,
            time_info: "2024-05-01".to_string(),
        };
        self.stored.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn delete(&self, document_id: &str) -> tomo_core::Result<()> {
        self.stored
            .lock()
            .unwrap()
            .retain(|document| document.id != document_id);
        Ok(())
    }

    async fn fetch(&self, document_id: &str) -> tomo_core::Result<DocumentDownload> {
        Err(TomoError::request_failed(
            404,
            format!("Document {document_id} not found"),
        ))
    }
}

struct Fixture {
    controller: Arc<AppController>,
    state: Arc<MockStateRepository>,
    chat: Arc<MockChatService>,
}

fn fixture() -> Fixture {
    let state = Arc::new(MockStateRepository::new());
    let chat = Arc::new(MockChatService::new("hi", "S1"));
    let controller = AppController::new(
        Arc::new(MockAuthService::new(state.clone())),
        state.clone(),
        chat.clone(),
        Arc::new(MockDocumentService::new()),
    );
    Fixture {
        controller,
        state,
        chat,
    }
}

#[tokio::test]
async fn test_login_then_first_send_adopts_session() {
    let Fixture {
        controller, state, ..
    } = fixture();

    controller.login("alice@example.com", "pw").await.unwrap();
    assert_eq!(controller.screen().await, Screen::Workspace);
    assert_eq!(
        controller.current_user().await.unwrap().email,
        "alice@example.com"
    );

    controller.send("hello").await.unwrap();

    assert_eq!(controller.active_session_id().await, Some("S1".to_string()));
    assert_eq!(state.get_active_session().await, Some("S1".to_string()));
    let messages = controller.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "hello");
    assert_eq!(messages[1].text, "hi");

    // Persisting the draft re-fetched the directory.
    let sessions = controller.sessions().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, "S1");
}

#[tokio::test]
async fn test_startup_without_credential_routes_to_login() {
    let Fixture { controller, .. } = fixture();

    assert_eq!(controller.startup().await.unwrap(), Screen::Login);
}

#[tokio::test]
async fn test_startup_with_credential_restores_workspace() {
    let Fixture {
        controller,
        state,
        chat,
    } = fixture();
    state
        .set_credential(Credential::bearer("tok"))
        .await
        .unwrap();
    state.set_active_session("S9".to_string()).await.unwrap();
    chat.set_history(
        "S9",
        vec![ChatMessage {
            id: "1".to_string(),
            role: MessageRole::User,
            text: "earlier".to_string(),
            citations: Vec::new(),
            timestamp: Utc::now(),
        }],
    );

    assert_eq!(controller.startup().await.unwrap(), Screen::Workspace);
    assert_eq!(controller.active_session_id().await, Some("S9".to_string()));
    assert_eq!(controller.messages().await.len(), 1);
    assert!(controller.current_user().await.is_some());
}

#[tokio::test]
async fn test_unauthorized_resets_everything_idempotently() {
    let Fixture {
        controller, state, ..
    } = fixture();
    controller.login("alice@example.com", "pw").await.unwrap();
    controller.send("hello").await.unwrap();
    controller
        .upload_document(b"x".to_vec(), "a.txt")
        .await
        .unwrap();

    // Several in-flight requests may each discover the expiry.
    controller.handle_unauthorized().await;
    controller.handle_unauthorized().await;

    assert_eq!(controller.screen().await, Screen::Login);
    assert!(!state.has_credential().await);
    assert!(state.get_active_session().await.is_none());
    assert!(controller.messages().await.is_empty());
    assert!(controller.sessions().await.is_empty());
    assert!(controller.documents().await.is_empty());
    assert!(controller.current_user().await.is_none());
}

#[tokio::test]
async fn test_request_layer_expiry_drives_the_controller_reset() {
    let Fixture {
        controller, state, ..
    } = fixture();
    controller.login("alice@example.com", "pw").await.unwrap();

    let client = ApiClient::new("http://localhost:8000/api", state.clone());
    controller.attach_to(&client);

    let response: reqwest::Response = http::Response::builder()
        .status(401)
        .body(String::new())
        .unwrap()
        .into();
    let err = client.handle_no_content(response).await.unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(controller.screen().await, Screen::Login);
    assert!(!state.has_credential().await);
}

#[tokio::test]
async fn test_logout_clears_local_state() {
    let Fixture {
        controller, state, ..
    } = fixture();
    controller.login("alice@example.com", "pw").await.unwrap();
    controller.send("hello").await.unwrap();

    controller.logout().await.unwrap();

    assert_eq!(controller.screen().await, Screen::Login);
    assert!(!state.has_credential().await);
    assert!(state.get_active_session().await.is_none());
    assert!(controller.messages().await.is_empty());
}

#[tokio::test]
async fn test_deleting_the_active_session_falls_back_to_draft() {
    let Fixture { controller, .. } = fixture();
    controller.login("alice@example.com", "pw").await.unwrap();
    controller.send("hello").await.unwrap();
    assert_eq!(controller.active_session_id().await, Some("S1".to_string()));

    controller.delete_session("S1").await.unwrap();

    assert_eq!(controller.active_session_id().await, None);
    assert!(controller.messages().await.is_empty());
    assert!(controller.sessions().await.is_empty());
}
