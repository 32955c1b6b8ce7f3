//! User account domain model.

use serde::{Deserialize, Serialize};

/// The authenticated user's account record as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Server-assigned numeric id.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Role name (e.g. "user", "admin").
    pub role: String,
    /// Whether the account is active.
    pub is_active: bool,
}
