//! Orphan reconciliation: drop document records whose file is gone.
//!
//! Runs once at process start. Best-effort: a failure is logged and
//! reported as zero removals, never propagated to the host process.

use std::path::Path;

use rusqlite::Connection;

use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::basename;

/// Remove every document record whose stored file no longer exists under
/// the uploads directory. Returns the number of records removed.
///
/// Only the document rows are removed; their extraction sets are left in
/// place.
pub fn cleanup_orphaned_documents(conn: &Connection, uploads_dir: &Path) -> usize {
    match sweep(conn, uploads_dir) {
        Ok(0) => {
            tracing::debug!("No orphaned documents found");
            0
        }
        Ok(removed) => {
            tracing::info!(removed, "Removed orphaned document records");
            removed
        }
        Err(e) => {
            tracing::error!(error = %e, "Document cleanup failed");
            0
        }
    }
}

fn sweep(conn: &Connection, uploads_dir: &Path) -> Result<usize, DatabaseError> {
    let mut removed = 0;
    for doc in repository::list_documents(conn)? {
        let name = basename(&doc.file_path);
        let present = !name.is_empty() && uploads_dir.join(&name).exists();
        if !present {
            tracing::warn!(
                document_id = %doc.id,
                file_name = %doc.file_name,
                "File not found for document, removing record"
            );
            repository::delete_document(conn, &doc.id)?;
            removed += 1;
        }
    }
    Ok(removed)
}
