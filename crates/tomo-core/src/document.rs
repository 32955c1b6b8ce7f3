//! Document domain model and service trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind of a document, inferred client-side from the filename suffix.
///
/// Uploads only ever produce `Pdf` or `Text`; `Link` documents are created
/// server-side (no client path produces them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Text,
    Link,
}

impl DocumentKind {
    /// Infers the kind from a filename suffix: `.pdf` is a PDF, anything
    /// else is treated as text.
    pub fn from_filename(name: &str) -> Self {
        if name.to_lowercase().ends_with(".pdf") {
            Self::Pdf
        } else {
            Self::Text
        }
    }
}

/// Synchronization status of a document.
///
/// Records returned by the server are always `Synced` - the server is the
/// single source of truth, and no intermediate "uploading" status is
/// modeled beyond the upload operation's own pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    Synced,
    Uploaded,
    Linked,
}

/// A document known to the registry.
///
/// Created on successful upload, removed on successful delete, never
/// mutated otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned id (stringified).
    pub id: String,
    /// Original filename.
    pub name: String,
    pub kind: DocumentKind,
    pub sync_status: SyncStatus,
    /// Human-readable creation date.
    pub time_info: String,
}

/// A document record paired with a short-lived download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDownload {
    pub document: Document,
    pub download_url: String,
}

/// An abstract client for the document endpoints.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Lists the user's documents.
    async fn list(&self) -> Result<Vec<Document>>;

    /// Uploads a file and returns the server's record mapped to a
    /// `Document`.
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<Document>;

    /// Deletes a document server-side.
    async fn delete(&self, document_id: &str) -> Result<()>;

    /// Fetches one document's record plus a download URL.
    async fn fetch(&self, document_id: &str) -> Result<DocumentDownload>;
}
