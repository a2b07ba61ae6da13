//! Document lifecycle service: upload acceptance, metadata projection,
//! extraction retrieval, deletion, and file resolution.
//!
//! All operations take a `&Connection`; callers own the connection and
//! there is no cross-operation state.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository;
use crate::db::DatabaseError;
use crate::extractions;
use crate::models::{
    basename, Document, DocumentExtractions, DocumentMetadata, ExtractionSet, UploadedFile,
};

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found")]
    NotFound,

    #[error("No extractions found for this document")]
    NoExtractions,

    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Only PDF files are allowed")]
    OnlyPdfAllowed,

    #[error("File path not found")]
    FilePathNotFound,

    #[error("File not found on disk")]
    FileNotFoundOnDisk,

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

fn parse_id(id: &str) -> Result<Uuid, DocumentError> {
    Uuid::parse_str(id).map_err(|_| DocumentError::InvalidId(id.to_string()))
}

/// Metadata projections for every stored document.
pub fn list_documents(conn: &Connection) -> Result<Vec<DocumentMetadata>, DocumentError> {
    let docs = repository::list_documents(conn)?;
    Ok(docs.iter().map(Document::metadata).collect())
}

/// Accept an uploaded file: create the document record, then synthesize
/// and persist its placeholder extraction set.
///
/// The two inserts are independent writes. If the extraction insert fails
/// after the document insert succeeded, the document is left without
/// extractions until it is deleted by hand.
pub fn create_document(
    conn: &Connection,
    upload: &UploadedFile,
) -> Result<DocumentMetadata, DocumentError> {
    // The upload boundary already filters, but the service enforces its
    // own precondition.
    if upload.mime_type != PDF_MIME {
        return Err(DocumentError::OnlyPdfAllowed);
    }

    let now = Utc::now();
    let doc = Document {
        id: Uuid::new_v4(),
        title: upload.original_name.clone(),
        description: "Uploaded document".into(),
        file_name: upload.original_name.clone(),
        file_path: format!("/uploads/{}", upload.stored_name),
        file_type: upload.mime_type.clone(),
        size_bytes: upload.size_bytes,
        uploaded_by: "system".into(),
        version: 1,
        page_count: 0,
        created_at: now,
        updated_at: now,
    };
    repository::insert_document(conn, &doc)?;

    let generated = extractions::generate(&doc.id);
    let set = ExtractionSet {
        id: Uuid::new_v4(),
        document_id: doc.id,
        extractions: generated.extractions,
        created_at: Utc::now(),
    };
    repository::insert_extraction_set(conn, &set)?;

    tracing::info!(
        document_id = %doc.id,
        file_name = %doc.file_name,
        size_bytes = doc.size_bytes,
        "Document created"
    );
    Ok(doc.metadata())
}

pub fn get_document_metadata(
    conn: &Connection,
    id: &str,
) -> Result<DocumentMetadata, DocumentError> {
    let id = parse_id(id)?;
    let doc = repository::get_document(conn, &id)?.ok_or(DocumentError::NotFound)?;
    Ok(doc.metadata())
}

/// Extractions for a document, sorted ascending by page number. Ties keep
/// insertion order. `total_pages` falls back to 1 when the record has no
/// declared page count.
pub fn get_document_extractions(
    conn: &Connection,
    id: &str,
) -> Result<DocumentExtractions, DocumentError> {
    let id = parse_id(id)?;
    let doc = repository::get_document(conn, &id)?.ok_or(DocumentError::NotFound)?;
    let set = repository::get_extraction_set_by_document(conn, &doc.id)?
        .ok_or(DocumentError::NoExtractions)?;

    let mut extractions = set.extractions;
    extractions.sort_by_key(|e| e.page_number);

    let total_pages = if doc.page_count > 0 { doc.page_count } else { 1 };

    Ok(DocumentExtractions {
        document_id: doc.id.to_string(),
        extractions,
        total_pages,
    })
}

/// Delete a document and its extraction set. The set goes first; its
/// absence is not an error. The two deletes are independent writes, not
/// one transaction.
pub fn delete_document(conn: &Connection, id: &str) -> Result<(), DocumentError> {
    let id = parse_id(id)?;
    let doc = repository::get_document(conn, &id)?.ok_or(DocumentError::NotFound)?;

    repository::delete_extraction_set_by_document(conn, &doc.id)?;
    repository::delete_document(conn, &doc.id)?;

    tracing::info!(document_id = %doc.id, "Document deleted");
    Ok(())
}

/// Resolve a document's on-disk file for transmission. Only the basename
/// of the stored path is honored, so a stored path can never point
/// outside the uploads directory.
pub fn resolve_document_file(
    conn: &Connection,
    uploads_dir: &Path,
    id: &str,
) -> Result<(PathBuf, String), DocumentError> {
    let id = parse_id(id)?;
    let doc = repository::get_document(conn, &id)?.ok_or(DocumentError::NotFound)?;

    let name = basename(&doc.file_path);
    if name.is_empty() {
        return Err(DocumentError::FilePathNotFound);
    }

    let path = uploads_dir.join(&name);
    if !path.exists() {
        return Err(DocumentError::FileNotFoundOnDisk);
    }

    Ok((path, doc.file_name))
}
