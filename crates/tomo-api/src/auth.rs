//! HTTP implementation of the auth service.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tomo_core::auth::AuthService;
use tomo_core::credential::Credential;
use tomo_core::error::Result;
use tomo_core::user::UserInfo;

use crate::client::ApiClient;

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: i64,
    email: String,
    role: String,
    is_active: bool,
}

impl From<UserRecord> for UserInfo {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            role: record.role,
            is_active: record.is_active,
        }
    }
}

/// Auth service backed by the `/auth` endpoints.
pub struct HttpAuthService {
    client: Arc<ApiClient>,
}

impl HttpAuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<Credential> {
        let response = self
            .client
            .post_form(
                "/auth/login",
                &[("username", username), ("password", password)],
            )
            .await?;
        let token: TokenResponse = self.client.handle_response(response).await?;

        let credential = Credential::new(token.access_token, token.token_type);
        self.client
            .state()
            .set_credential(credential.clone())
            .await?;
        tracing::info!(%username, "logged in");

        Ok(credential)
    }

    async fn register(&self, email: &str, password: &str) -> Result<UserInfo> {
        let response = self
            .client
            .post_json("/auth/register", &RegisterRequest { email, password })
            .await?;
        let record: UserRecord = self.client.handle_response(response).await?;
        Ok(record.into())
    }

    async fn current_user(&self) -> Result<UserInfo> {
        let response = self.client.get("/auth/me").await?;
        let record: UserRecord = self.client.handle_response(response).await?;
        Ok(record.into())
    }

    async fn logout(&self) -> Result<()> {
        self.client.state().clear_credential().await
    }

    async fn is_authenticated(&self) -> bool {
        self.client.state().has_credential().await
    }
}
