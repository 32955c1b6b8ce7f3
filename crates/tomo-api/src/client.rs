//! Authenticated request layer.
//!
//! Every outbound call goes through `ApiClient`, which attaches the
//! Authorization header derived from the stored credential, and every
//! response comes back through one funnel (`check`). The funnel is the
//! single place that interprets status codes and the single origin of the
//! global "unauthorized" signal - no other component handles 401.

use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use reqwest::header::AUTHORIZATION;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::Serialize;

use tomo_core::error::{Result, TomoError};
use tomo_core::state::StateRepository;

/// User-facing message carried by the `AuthExpired` error.
const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please sign in again.";

/// Handler invoked when any request discovers credential expiry.
///
/// Returns a future so the funnel can await the reset before surfacing the
/// error. Because several requests may be in flight when a credential
/// expires, the handler must tolerate being invoked more than once in
/// quick succession (idempotent reset).
pub type UnauthorizedHandler = Box<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Structured error body produced by the service for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// The authenticated HTTP client.
///
/// Holds the base URL, the state repository the credential is read from
/// (and cleared into on expiry), and a single-slot unauthorized observer.
/// Registration is idempotent and last-writer-wins; exactly one handler is
/// active at a time.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    state: Arc<dyn StateRepository>,
    on_unauthorized: Mutex<Option<UnauthorizedHandler>>,
}

impl ApiClient {
    /// Creates a client for the given API base URL.
    pub fn new(base_url: impl Into<String>, state: Arc<dyn StateRepository>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            state,
            on_unauthorized: Mutex::new(None),
        }
    }

    /// The state repository this client reads the credential from.
    pub fn state(&self) -> &Arc<dyn StateRepository> {
        &self.state
    }

    /// Registers the handler invoked on credential expiry.
    ///
    /// Last writer wins; any previously registered handler is replaced.
    pub fn set_on_unauthorized<F>(&self, handler: F)
    where
        F: Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        *self.on_unauthorized.lock() = Some(Box::new(handler));
    }

    /// Removes the registered handler, if any.
    pub fn clear_on_unauthorized(&self) {
        *self.on_unauthorized.lock() = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorization_header(&self) -> Option<String> {
        self.state
            .get_credential()
            .await
            .map(|credential| credential.header_value())
    }

    async fn send(&self, mut request: reqwest::RequestBuilder) -> Result<Response> {
        if let Some(header) = self.authorization_header().await {
            request = request.header(AUTHORIZATION, header);
        }
        request.send().await.map_err(TomoError::from)
    }

    /// Issues a GET request.
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.send(self.http.get(self.url(path))).await
    }

    /// Issues a POST request with a JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    /// Issues a POST request with a form-encoded body.
    pub async fn post_form<B: Serialize + ?Sized>(&self, path: &str, form: &B) -> Result<Response> {
        self.send(self.http.post(self.url(path)).form(form)).await
    }

    /// Issues a POST request with a multipart body.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Response> {
        self.send(self.http.post(self.url(path)).multipart(form))
            .await
    }

    /// Issues a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.send(self.http.delete(self.url(path))).await
    }

    /// Funnels a response and parses its JSON body.
    pub async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let response = self.check(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Err(TomoError::decode(
                "expected a response body, got 204 No Content",
            ));
        }
        response.json::<T>().await.map_err(TomoError::from)
    }

    /// Funnels a response and discards its body.
    ///
    /// The service answers some deletes with 204 and others with a trivial
    /// JSON body; any success status passes.
    pub async fn handle_no_content(&self, response: Response) -> Result<()> {
        self.check(response).await.map(|_| ())
    }

    /// The single classification point for every response.
    ///
    /// 401 clears the credential, runs the unauthorized handler, and fails
    /// with `AuthExpired`. Other non-success statuses fail with
    /// `RequestFailed`, preferring the server's `detail` field over a
    /// generic status line. Success statuses pass through untouched.
    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if let Err(err) = self.state.clear_credential().await {
                tracing::warn!(%err, "failed to clear credential after 401");
            }
            let reset = {
                let slot = self.on_unauthorized.lock();
                slot.as_ref().map(|handler| handler())
            };
            if let Some(reset) = reset {
                reset.await;
            }
            return Err(TomoError::auth_expired(SESSION_EXPIRED_MESSAGE));
        }

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail);
            let message = detail.unwrap_or_else(|| {
                format!(
                    "Error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown Error")
                )
            });
            return Err(TomoError::request_failed(status.as_u16(), message));
        }

        Ok(response)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
