//! Application layer for the Tomo client.
//!
//! Coordinates the domain and HTTP layers into the client-side state
//! machine: the message synchronizer owning the active conversation, the
//! session directory, the document registry, and the top-level controller
//! that reacts to credential expiry.

pub mod chat_sync;
pub mod controller;
pub mod document_registry;
pub mod session_directory;

pub use chat_sync::ChatSynchronizer;
pub use controller::{AppController, Screen};
pub use document_registry::DocumentRegistry;
pub use session_directory::SessionDirectory;
