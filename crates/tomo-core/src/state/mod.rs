//! Persisted client state.
//!
//! The durable key-value store surviving restarts: the access credential
//! and the active conversation id.

pub mod model;
pub mod repository;

pub use model::ClientState;
pub use repository::StateRepository;
