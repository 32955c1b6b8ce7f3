//! HTTP implementation of the document service.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use tomo_core::document::{Document, DocumentDownload, DocumentKind, DocumentService, SyncStatus};
use tomo_core::error::Result;

use crate::client::ApiClient;
use crate::wire::parse_timestamp;

#[derive(Debug, Deserialize)]
struct DocumentRecord {
    id: i64,
    filename: String,
    #[allow(dead_code)]
    size: u64,
    #[allow(dead_code)]
    content_type: Option<String>,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct DocumentDownloadRecord {
    metadata: DocumentRecord,
    download_url: String,
}

fn map_document(record: DocumentRecord) -> Result<Document> {
    let created_at = parse_timestamp(&record.created_at)?;
    Ok(Document {
        id: record.id.to_string(),
        kind: DocumentKind::from_filename(&record.filename),
        name: record.filename,
        // Anything the server returns is stored server-side; the server is
        // the single source of truth.
        sync_status: SyncStatus::Synced,
        time_info: created_at.format("%Y-%m-%d").to_string(),
    })
}

/// Document service backed by the `/documents` endpoints.
pub struct HttpDocumentService {
    client: Arc<ApiClient>,
}

impl HttpDocumentService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn list(&self) -> Result<Vec<Document>> {
        let response = self.client.get("/documents/").await?;
        let records: Vec<DocumentRecord> = self.client.handle_response(response).await?;
        records.into_iter().map(map_document).collect()
    }

    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<Document> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())
            .map_err(tomo_core::TomoError::from)?;
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post_multipart("/documents/upload", form).await?;
        let record: DocumentRecord = self.client.handle_response(response).await?;
        map_document(record)
    }

    async fn delete(&self, document_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(&format!("/documents/{document_id}"))
            .await?;
        self.client.handle_no_content(response).await
    }

    async fn fetch(&self, document_id: &str) -> Result<DocumentDownload> {
        let response = self
            .client
            .get(&format!("/documents/{document_id}"))
            .await?;
        let record: DocumentDownloadRecord = self.client.handle_response(response).await?;
        Ok(DocumentDownload {
            document: map_document(record.metadata)?,
            download_url: record.download_url,
        })
    }
}
