//! Multipart upload boundary.
//!
//! Accepts a single `file` form field, gates it on the declared MIME type
//! and extension *before* anything touches disk, then stages the bytes
//! under the uploads directory with a unique name. The lifecycle service
//! receives only the resulting [`UploadedFile`] artifact.

use std::path::Path;

use axum::extract::Multipart;
use chrono::Utc;
use rand::Rng;

use crate::api::error::ApiError;
use crate::config::MAX_UPLOAD_BYTES;
use crate::documents::{DocumentError, PDF_MIME};
use crate::models::UploadedFile;

/// Parse a multipart request and stage the uploaded PDF on disk.
pub async fn parse_upload(
    mut multipart: Multipart,
    uploads_dir: &Path,
) -> Result<UploadedFile, ApiError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::UploadError)?
    {
        if field.name() != Some("file") {
            // Drain and ignore unknown fields.
            let _ = field.bytes().await;
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();

        if mime_type != PDF_MIME {
            return Err(DocumentError::OnlyPdfAllowed.into());
        }
        if !original_name.to_lowercase().ends_with(".pdf") {
            return Err(DocumentError::OnlyPdfAllowed.into());
        }

        let data = field.bytes().await.map_err(|_| ApiError::UploadError)?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::FileTooLarge);
        }

        let stored_name = unique_file_name();
        tokio::fs::write(uploads_dir.join(&stored_name), &data)
            .await
            .map_err(|e| ApiError::Internal(format!("Staging upload: {e}")))?;

        file = Some(UploadedFile {
            original_name,
            stored_name,
            mime_type,
            size_bytes: data.len() as i64,
        });
    }

    file.ok_or_else(|| DocumentError::NoFileUploaded.into())
}

/// Unique on-disk name: field name, millisecond timestamp, random suffix.
fn unique_file_name() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("file-{}-{suffix}.pdf", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_names_keep_the_pdf_extension() {
        let a = unique_file_name();
        let b = unique_file_name();
        assert!(a.starts_with("file-"));
        assert!(a.ends_with(".pdf"));
        assert_ne!(a, b);
    }
}
