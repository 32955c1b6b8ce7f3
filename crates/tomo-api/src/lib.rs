//! HTTP implementations of the Tomo service traits.
//!
//! `ApiClient` is the authenticated request layer: it attaches the
//! Authorization header from the stored credential and funnels every
//! response through a single classification point, which is also the sole
//! origin of the global "credential expired" signal. The service structs
//! (`HttpAuthService`, `HttpChatService`, `HttpDocumentService`) implement
//! the `tomo-core` traits on top of it.

pub mod auth;
pub mod chat;
pub mod client;
pub mod documents;
mod wire;

pub use auth::HttpAuthService;
pub use chat::HttpChatService;
pub use client::ApiClient;
pub use documents::HttpDocumentService;
