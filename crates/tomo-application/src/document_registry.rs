//! Document registry.
//!
//! Keeps the client-side document list synchronized with server state
//! through explicit add/remove operations - no diffing. Unlike the message
//! synchronizer's optimistic appends, deletes here wait for server
//! confirmation: a failed delete leaving a stale-looking item is
//! preferable to one that silently resurrects.

use std::sync::Arc;

use tokio::sync::Mutex;

use tomo_core::document::{Document, DocumentDownload, DocumentService};
use tomo_core::error::Result;

/// Cached list of the user's documents.
pub struct DocumentRegistry {
    service: Arc<dyn DocumentService>,
    documents: Mutex<Vec<Document>>,
}

impl DocumentRegistry {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self {
            service,
            documents: Mutex::new(Vec::new()),
        }
    }

    /// Returns the cached list.
    pub async fn documents(&self) -> Vec<Document> {
        self.documents.lock().await.clone()
    }

    /// Re-fetches the list from the server, replacing the cache. A failed
    /// fetch leaves the previous cache untouched.
    pub async fn refresh(&self) -> Result<Vec<Document>> {
        let listed = self.service.list().await?;
        *self.documents.lock().await = listed.clone();
        Ok(listed)
    }

    /// Uploads a file; the server's record is appended to the cache.
    pub async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<Document> {
        let document = self.service.upload(bytes, file_name).await?;
        self.documents.lock().await.push(document.clone());
        Ok(document)
    }

    /// Deletes a document; the cache entry is removed only after server
    /// confirmation.
    pub async fn delete(&self, document_id: &str) -> Result<()> {
        self.service.delete(document_id).await?;
        self.documents
            .lock()
            .await
            .retain(|document| document.id != document_id);
        Ok(())
    }

    /// Fetches one document's record plus its download URL. Passthrough,
    /// not cached - the URL is short-lived.
    pub async fn fetch(&self, document_id: &str) -> Result<DocumentDownload> {
        self.service.fetch(document_id).await
    }

    /// Empties the cache. Used by the credential-expiry path.
    pub async fn clear(&self) {
        self.documents.lock().await.clear();
    }
}
