use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Document;

const DOCUMENT_COLUMNS: &str = "id, title, description, file_name, file_path, file_type, \
     size_bytes, uploaded_by, version, page_count, created_at, updated_at";

pub fn insert_document(conn: &Connection, doc: &Document) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO documents (id, title, description, file_name, file_path, file_type,
         size_bytes, uploaded_by, version, page_count, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            doc.id.to_string(),
            doc.title,
            doc.description,
            doc.file_name,
            doc.file_path,
            doc.file_type,
            doc.size_bytes,
            doc.uploaded_by,
            doc.version,
            doc.page_count,
            doc.created_at,
            doc.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_document(conn: &Connection, id: &Uuid) -> Result<Option<Document>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"))?;
    let result = stmt.query_row(params![id.to_string()], row_to_document_row);

    match result {
        Ok(row) => Ok(Some(document_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_documents(conn: &Connection) -> Result<Vec<Document>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY created_at ASC"
    ))?;
    let rows = stmt.query_map([], row_to_document_row)?;

    let mut docs = Vec::new();
    for row in rows {
        docs.push(document_from_row(row?)?);
    }
    Ok(docs)
}

/// Delete a document row. Returns whether a row existed.
pub fn delete_document(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM documents WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(deleted > 0)
}

struct DocumentRow {
    id: String,
    title: String,
    description: String,
    file_name: String,
    file_path: String,
    file_type: String,
    size_bytes: i64,
    uploaded_by: String,
    version: i64,
    page_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn row_to_document_row(row: &Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        file_name: row.get(3)?,
        file_path: row.get(4)?,
        file_type: row.get(5)?,
        size_bytes: row.get(6)?,
        uploaded_by: row.get(7)?,
        version: row.get(8)?,
        page_count: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn document_from_row(row: DocumentRow) -> Result<Document, DatabaseError> {
    Ok(Document {
        id: Uuid::parse_str(&row.id).map_err(|_| DatabaseError::InvalidValue {
            field: "documents.id".into(),
            value: row.id,
        })?,
        title: row.title,
        description: row.description,
        file_name: row.file_name,
        file_path: row.file_path,
        file_type: row.file_type,
        size_bytes: row.size_bytes,
        uploaded_by: row.uploaded_by,
        version: row.version,
        page_count: row.page_count,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
