//! Unified path management for Tomo client files.
//!
//! All persisted client state lives under the platform config directory,
//! resolved via the `dirs` crate for consistency across Linux, macOS, and
//! Windows.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for Tomo.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/tomo/              # Config directory
/// └── state.toml               # Persisted client state (credential, active session)
/// ```
pub struct TomoPaths;

impl TomoPaths {
    /// Returns the Tomo configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/tomo/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("tomo"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the persisted client state file.
    pub fn state_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("state.toml"))
    }
}
