//! Access credential domain model.
//!
//! A credential is the token pair returned by a successful login. It lives
//! only in the persisted client state; absence means "not authenticated".
//! No expiry timer runs locally - expiry is discovered reactively when a
//! request comes back 401.

use serde::{Deserialize, Serialize};

/// Default token type used by the service when none is specified.
pub const DEFAULT_TOKEN_TYPE: &str = "bearer";

/// An access credential issued by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque access token.
    pub token: String,
    /// Token type used in the Authorization header (normally "bearer").
    pub token_type: String,
}

impl Credential {
    /// Creates a credential with an explicit token type.
    pub fn new(token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: token_type.into(),
        }
    }

    /// Creates a credential with the default `bearer` token type.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(token, DEFAULT_TOKEN_TYPE)
    }

    /// Returns the value for the `Authorization` header:
    /// `"{token_type} {token}"`.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}
