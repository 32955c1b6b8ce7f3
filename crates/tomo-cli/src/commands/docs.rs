//! Document commands.

use std::path::Path;

use anyhow::{Context, Result, bail};

use tomo_application::AppController;
use tomo_core::document::DocumentKind;

fn kind_label(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Pdf => "pdf",
        DocumentKind::Text => "text",
        DocumentKind::Link => "link",
    }
}

pub async fn list(controller: &AppController) -> Result<()> {
    let documents = controller.refresh_documents().await?;
    if documents.is_empty() {
        println!("No documents");
        return Ok(());
    }

    for document in documents {
        println!(
            "{}  {:<5} {}  {}",
            document.id,
            kind_label(document.kind),
            document.time_info,
            document.name
        );
    }
    Ok(())
}

pub async fn upload(controller: &AppController, path: &Path) -> Result<()> {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        bail!("path has no usable file name: {}", path.display());
    };
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let document = controller.upload_document(bytes, file_name).await?;
    println!("Uploaded {} (id {})", document.name, document.id);
    Ok(())
}

pub async fn delete(controller: &AppController, document_id: &str) -> Result<()> {
    controller.delete_document(document_id).await?;
    println!("Deleted document {document_id}");
    Ok(())
}

pub async fn url(controller: &AppController, document_id: &str) -> Result<()> {
    let download = controller.fetch_document(document_id).await?;
    println!("{}", download.download_url);
    Ok(())
}
