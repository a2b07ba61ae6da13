//! Document endpoints: upload, list, metadata, extractions, file
//! download, delete. Handlers stay thin; the lifecycle service owns the
//! semantics.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::api::upload;
use crate::documents;
use crate::models::{DocumentExtractions, DocumentMetadata};

/// `POST /api/documents`: accept a PDF upload, create the record and its
/// placeholder extractions. 201 on success.
pub async fn upload_document(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentMetadata>), ApiError> {
    let artifact = upload::parse_upload(multipart, &ctx.config.uploads_dir()).await?;

    let conn = ctx.open_db()?;
    let metadata = documents::create_document(&conn, &artifact)?;
    Ok((StatusCode::CREATED, Json(metadata)))
}

/// `GET /api/documents`: metadata projections for every document.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<DocumentMetadata>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(documents::list_documents(&conn)?))
}

/// `GET /api/documents/:id`: one metadata projection.
pub async fn metadata(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<DocumentMetadata>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(documents::get_document_metadata(&conn, &id)?))
}

/// `GET /api/documents/:id/extractions`: sorted extraction set.
pub async fn extractions(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<DocumentExtractions>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(documents::get_document_extractions(&conn, &id)?))
}

/// `GET /api/documents/:id/file`: send the stored PDF inline.
pub async fn file(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    let (path, file_name) =
        documents::resolve_document_file(&conn, &ctx.config.uploads_dir(), &id)?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::error!(error = %e, path = %path.display(), "Error sending file");
        ApiError::FileSendError
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, documents::PDF_MIME)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{file_name}\""),
        )
        .header(header::CONTENT_LENGTH, bytes.len().to_string())
        .body(Body::from(bytes))
        .map_err(|_| ApiError::FileSendError)
}

/// `DELETE /api/documents/:id`: cascade delete, 204 on success.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    documents::delete_document(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
