//! Error types for the Tomo client.

use thiserror::Error;

/// A shared error type for the entire Tomo client.
///
/// The request layer is the only place that classifies HTTP responses into
/// these variants; every other component propagates them unchanged. No
/// operation retries anywhere - each failure is fatal to that operation.
#[derive(Error, Debug, Clone)]
pub enum TomoError {
    /// The server rejected the stored credential (401). By the time this
    /// error is observed, the credential has already been cleared and the
    /// global unauthorized observer has run.
    #[error("{message}")]
    AuthExpired { message: String },

    /// Any other non-success response. The message is the server's `detail`
    /// field when the body carries one, or a generic status line.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// Transport-level failure before a status code was received.
    #[error("Network error: {0}")]
    Network(String),

    /// A response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// IO error (state file operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error (paths, base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TomoError {
    /// Creates an AuthExpired error
    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self::AuthExpired {
            message: message.into(),
        }
    }

    /// Creates a RequestFailed error
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an AuthExpired error
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }

    /// Check if this is a RequestFailed error
    pub fn is_request_failed(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns the HTTP status for RequestFailed errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TomoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TomoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TomoError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TomoError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Transport and body-decode failures from the HTTP client.
///
/// Status-code classification does NOT happen here - the request layer's
/// response funnel owns that. This conversion only covers errors reqwest
/// itself produces (connect/timeout/body problems).
impl From<reqwest::Error> for TomoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// A type alias for `Result<T, TomoError>`.
pub type Result<T> = std::result::Result<T, TomoError>;
