//! Authentication service trait.

use async_trait::async_trait;

use crate::credential::Credential;
use crate::error::Result;
use crate::user::UserInfo;

/// Service for account operations against the auth endpoints.
///
/// Implementations are expected to store the credential into the client
/// state on a successful login and to clear it on logout; logout is a
/// purely local operation (there is no server-side session to revoke).
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges a username/password pair for an access credential and
    /// persists it.
    async fn login(&self, username: &str, password: &str) -> Result<Credential>;

    /// Creates a new account. Does not log the user in.
    async fn register(&self, email: &str, password: &str) -> Result<UserInfo>;

    /// Fetches the account record for the stored credential.
    async fn current_user(&self) -> Result<UserInfo>;

    /// Clears the stored credential. No network call.
    async fn logout(&self) -> Result<()>;

    /// Whether a credential is currently stored.
    ///
    /// This only answers "does a credential exist" - validity is discovered
    /// reactively when a request fails with 401.
    async fn is_authenticated(&self) -> bool;
}
