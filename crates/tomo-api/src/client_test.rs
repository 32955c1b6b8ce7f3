use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::future::BoxFuture;

use tomo_core::credential::Credential;
use tomo_core::error::TomoError;
use tomo_core::state::{ClientState, StateRepository};

use super::ApiClient;

/// In-memory state repository tracking how often the credential was
/// cleared.
struct MockStateRepository {
    state: std::sync::Mutex<ClientState>,
    credential_clears: AtomicUsize,
}

impl MockStateRepository {
    fn with_credential() -> Self {
        Self {
            state: std::sync::Mutex::new(ClientState {
                credential: Some(Credential::bearer("tok")),
                active_session_id: None,
            }),
            credential_clears: AtomicUsize::new(0),
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
        self.credential_clears.fetch_add(1, Ordering::SeqCst);
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

fn response(status: u16, body: &str) -> reqwest::Response {
    http::Response::builder()
        .status(status)
        .body(body.to_string())
        .unwrap()
        .into()
}

fn client_with_state() -> (ApiClient, Arc<MockStateRepository>) {
    let state = Arc::new(MockStateRepository::with_credential());
    let client = ApiClient::new("http://localhost:8000/api", state.clone());
    (client, state)
}

fn counting_handler(counter: Arc<AtomicUsize>) -> impl Fn() -> BoxFuture<'static, ()> + Send + Sync {
    move || {
        let counter = counter.clone();
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }
}

#[tokio::test]
async fn test_unauthorized_clears_credential_and_fires_handler() {
    let (client, state) = client_with_state();
    let fired = Arc::new(AtomicUsize::new(0));
    client.set_on_unauthorized(counting_handler(fired.clone()));

    let err = client
        .handle_no_content(response(401, ""))
        .await
        .unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(err.to_string(), "Session expired. Please sign in again.");
    assert!(!state.has_credential().await);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_unauthorized_responses_reset_idempotently() {
    let (client, state) = client_with_state();
    let fired = Arc::new(AtomicUsize::new(0));
    client.set_on_unauthorized(counting_handler(fired.clone()));

    // Two in-flight requests both come back 401; the handler runs for
    // each resolution and must be safe to invoke repeatedly.
    let first = client.handle_no_content(response(401, "")).await;
    let second = client.handle_no_content(response(401, "")).await;

    assert!(first.unwrap_err().is_auth_expired());
    assert!(second.unwrap_err().is_auth_expired());
    assert!(!state.has_credential().await);
    assert_eq!(fired.load(Ordering::SeqCst), 2);
    assert_eq!(state.credential_clears.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unauthorized_without_handler_still_clears_credential() {
    let (client, state) = client_with_state();

    let err = client
        .handle_no_content(response(401, ""))
        .await
        .unwrap_err();

    assert!(err.is_auth_expired());
    assert!(!state.has_credential().await);
}

#[tokio::test]
async fn test_handler_registration_is_last_writer_wins() {
    let (client, _state) = client_with_state();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    client.set_on_unauthorized(counting_handler(first.clone()));
    client.set_on_unauthorized(counting_handler(second.clone()));

    let _ = client.handle_no_content(response(401, "")).await;

    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_error_detail_is_preferred_over_status_line() {
    let (client, _state) = client_with_state();

    let err = client
        .handle_no_content(response(404, r#"{"detail": "Document not found"}"#))
        .await
        .unwrap_err();

    match err {
        TomoError::RequestFailed { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Document not found");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_error_body_falls_back_to_status_line() {
    let (client, _state) = client_with_state();

    let err = client
        .handle_no_content(response(500, "<html>boom</html>"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error 500: Internal Server Error");
}

#[tokio::test]
async fn test_no_content_succeeds_empty() {
    let (client, _state) = client_with_state();

    client.handle_no_content(response(204, "")).await.unwrap();
}

#[tokio::test]
async fn test_no_content_accepts_trivial_success_bodies() {
    // Document deletes answer 200 with `{"ok": true}` instead of 204.
    let (client, _state) = client_with_state();

    client
        .handle_no_content(response(200, r#"{"ok": true}"#))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_success_body_is_parsed() {
    #[derive(serde::Deserialize)]
    struct Token {
        access_token: String,
        token_type: String,
    }

    let (client, _state) = client_with_state();

    let token: Token = client
        .handle_response(response(
            200,
            r#"{"access_token": "abc", "token_type": "bearer"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(token.access_token, "abc");
    assert_eq!(token.token_type, "bearer");
}

#[tokio::test]
async fn test_malformed_success_body_is_a_decode_error() {
    let (client, _state) = client_with_state();

    let err = client
        .handle_response::<Vec<String>>(response(200, "{not json"))
        .await
        .unwrap_err();

    assert!(matches!(err, TomoError::Decode(_)));
}
