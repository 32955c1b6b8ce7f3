//! Filesystem-backed infrastructure for the Tomo client.
//!
//! Implements the persisted client state (credential + active conversation
//! id) on top of an atomically written TOML file under the platform config
//! directory.

pub mod paths;
pub mod state_repository;
pub mod storage;

pub use paths::TomoPaths;
pub use state_repository::StateRepositoryImpl;
