//! Core domain types and trait seams for the Tomo client.
//!
//! This crate knows nothing about HTTP or the filesystem. It defines the
//! domain model (credential, sessions, messages, documents), the shared
//! error type, and the async traits implemented by the `tomo-api` and
//! `tomo-infrastructure` crates.

pub mod auth;
pub mod chat;
pub mod credential;
pub mod document;
pub mod error;
pub mod state;
pub mod user;

pub use error::{Result, TomoError};
