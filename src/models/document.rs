use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored document record. The record is the sole owner of the file its
/// `file_path` points at for the record's whole lifetime.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_name: String,
    /// Server-relative storage path, e.g. `/uploads/file-1712-420.pdf`.
    pub file_path: String,
    pub file_type: String,
    pub size_bytes: i64,
    pub uploaded_by: String,
    pub version: i64,
    pub page_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// The externally-visible projection returned by every read operation.
    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            id: self.id.to_string(),
            file_name: self.file_name.clone(),
            file_url: format!("/uploads/{}", basename(&self.file_path)),
            upload_date: self
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            file_size: self.size_bytes,
            page_count: self.page_count,
        }
    }
}

/// Last path component of a stored path. Discards any directory part, so a
/// stored path can never escape the uploads directory when re-resolved.
pub fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Wire shape for document reads. Field names are part of the HTTP
/// contract, hence camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub id: String,
    pub file_name: String,
    pub file_url: String,
    pub upload_date: String,
    pub file_size: i64,
    pub page_count: i64,
}

/// One placeholder text snippet tied to a page of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub id: String,
    pub text: String,
    pub page_number: i64,
}

/// The full extraction set for one document. One-to-one with a document
/// via `document_id`; the document side holds no forward pointer.
#[derive(Debug, Clone)]
pub struct ExtractionSet {
    pub id: Uuid,
    pub document_id: Uuid,
    pub extractions: Vec<Extraction>,
    pub created_at: DateTime<Utc>,
}

/// Wire shape for `GET /documents/:id/extractions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExtractions {
    pub document_id: String,
    pub extractions: Vec<Extraction>,
    pub total_pages: i64,
}

/// File artifact handed to the lifecycle service by the upload boundary.
/// The bytes are already on disk under the uploads directory by the time
/// this exists.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub stored_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        Document {
            id: Uuid::new_v4(),
            title: "contract.pdf".into(),
            description: "Uploaded document".into(),
            file_name: "contract.pdf".into(),
            file_path: "/uploads/file-1712000000-42.pdf".into(),
            file_type: "application/pdf".into(),
            size_bytes: 1024,
            uploaded_by: "system".into(),
            version: 1,
            page_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn metadata_projection_shape() {
        let doc = sample_document();
        let meta = doc.metadata();
        assert_eq!(meta.id, doc.id.to_string());
        assert_eq!(meta.file_name, "contract.pdf");
        assert_eq!(meta.file_url, "/uploads/file-1712000000-42.pdf");
        assert_eq!(meta.file_size, 1024);
        assert_eq!(meta.page_count, 0);
        // JS-style ISO-8601 with milliseconds and Z suffix
        assert!(meta.upload_date.ends_with('Z'));
    }

    #[test]
    fn metadata_serializes_camel_case() {
        let json = serde_json::to_value(sample_document().metadata()).unwrap();
        assert!(json.get("fileName").is_some());
        assert!(json.get("fileUrl").is_some());
        assert!(json.get("uploadDate").is_some());
        assert!(json.get("fileSize").is_some());
        assert!(json.get("pageCount").is_some());
    }

    #[test]
    fn basename_discards_directory_components() {
        assert_eq!(basename("/uploads/a.pdf"), "a.pdf");
        assert_eq!(basename("a.pdf"), "a.pdf");
        assert_eq!(basename("/uploads/../../etc/passwd"), "passwd");
    }

    #[test]
    fn basename_of_empty_path_is_empty() {
        assert_eq!(basename(""), "");
        assert_eq!(basename("/"), "");
    }
}
