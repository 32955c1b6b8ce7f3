//! Persisted client state implementation.
//!
//! Reads and writes the client state (credential + active conversation id)
//! through an atomically written TOML file and caches it in memory to
//! avoid repeated file I/O. All trait methods are async; file writes run
//! on the blocking pool.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tomo_core::credential::Credential;
use tomo_core::error::{Result, TomoError};
use tomo_core::state::{ClientState, StateRepository};

use crate::paths::TomoPaths;
use crate::storage::AtomicTomlFile;

/// File-backed state repository with an in-memory cache.
#[derive(Clone)]
pub struct StateRepositoryImpl {
    /// Cached client state; the file is only read once, at construction.
    cache: Arc<Mutex<ClientState>>,
    /// Storage handle for persistence.
    file: Arc<AtomicTomlFile<ClientState>>,
}

impl StateRepositoryImpl {
    /// Creates a repository over the default state file
    /// (`~/.config/tomo/state.toml`) and loads the initial state.
    pub async fn new() -> Result<Self> {
        let path = TomoPaths::state_file()
            .map_err(|err| TomoError::config(format!("cannot resolve state file: {err}")))?;
        Self::with_path(path).await
    }

    /// Creates a repository over an explicit path (used by tests).
    pub async fn with_path(path: PathBuf) -> Result<Self> {
        let file = Arc::new(AtomicTomlFile::new(path));

        let loader = file.clone();
        let initial = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|err| TomoError::internal(format!("state load task failed: {err}")))??
            .unwrap_or_default();

        tracing::debug!(path = %file.path().display(), "loaded client state");

        Ok(Self {
            cache: Arc::new(Mutex::new(initial)),
            file,
        })
    }

    fn snapshot(&self) -> ClientState {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn mutate(&self, f: impl FnOnce(&mut ClientState)) -> ClientState {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut cache);
        cache.clone()
    }

    async fn persist(&self, state: ClientState) -> Result<()> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.save(&state))
            .await
            .map_err(|err| TomoError::internal(format!("state save task failed: {err}")))??;
        Ok(())
    }

    async fn update(&self, f: impl FnOnce(&mut ClientState)) -> Result<()> {
        let state = self.mutate(f);
        self.persist(state).await
    }
}

#[async_trait::async_trait]
impl StateRepository for StateRepositoryImpl {
    async fn save_state(&self, state: ClientState) -> Result<()> {
        self.update(|cache| *cache = state).await
    }

    async fn get_state(&self) -> Result<ClientState> {
        Ok(self.snapshot())
    }

    async fn get_credential(&self) -> Option<Credential> {
        self.snapshot().credential
    }

    async fn set_credential(&self, credential: Credential) -> Result<()> {
        self.update(|cache| cache.credential = Some(credential))
            .await
    }

    async fn clear_credential(&self) -> Result<()> {
        self.update(|cache| cache.credential = None).await
    }

    async fn has_credential(&self) -> bool {
        self.snapshot().credential.is_some()
    }

    async fn get_active_session(&self) -> Option<String> {
        self.snapshot().active_session_id
    }

    async fn set_active_session(&self, session_id: String) -> Result<()> {
        self.update(|cache| cache.active_session_id = Some(session_id))
            .await
    }

    async fn clear_active_session(&self) -> Result<()> {
        self.update(|cache| cache.active_session_id = None).await
    }
}
