use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Extraction, ExtractionSet};

/// Persist a set and its items. The `position` column records insertion
/// order; reads return items in that order.
pub fn insert_extraction_set(
    conn: &Connection,
    set: &ExtractionSet,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO extraction_sets (id, document_id, created_at) VALUES (?1, ?2, ?3)",
        params![set.id.to_string(), set.document_id.to_string(), set.created_at],
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO extraction_items (id, set_id, text, page_number, position)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (position, item) in set.extractions.iter().enumerate() {
        stmt.execute(params![
            item.id,
            set.id.to_string(),
            item.text,
            item.page_number,
            position as i64,
        ])?;
    }
    Ok(())
}

/// Reverse lookup: the set belonging to a document, items in insertion
/// order. `None` when no set exists for the document.
pub fn get_extraction_set_by_document(
    conn: &Connection,
    document_id: &Uuid,
) -> Result<Option<ExtractionSet>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, created_at FROM extraction_sets WHERE document_id = ?1",
    )?;
    let result = stmt.query_row(params![document_id.to_string()], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, DateTime<Utc>>(1)?))
    });

    let (set_id, created_at) = match result {
        Ok(pair) => pair,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut items_stmt = conn.prepare(
        "SELECT id, text, page_number FROM extraction_items
         WHERE set_id = ?1 ORDER BY position ASC",
    )?;
    let rows = items_stmt.query_map(params![set_id], |row| {
        Ok(Extraction {
            id: row.get(0)?,
            text: row.get(1)?,
            page_number: row.get(2)?,
        })
    })?;

    let mut extractions = Vec::new();
    for row in rows {
        extractions.push(row?);
    }

    Ok(Some(ExtractionSet {
        id: Uuid::parse_str(&set_id).map_err(|_| DatabaseError::InvalidValue {
            field: "extraction_sets.id".into(),
            value: set_id,
        })?,
        document_id: *document_id,
        extractions,
        created_at,
    }))
}

/// Delete the set for a document, if any. Items cascade with the set row.
/// Deleting when no set exists is not an error.
pub fn delete_extraction_set_by_document(
    conn: &Connection,
    document_id: &Uuid,
) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM extraction_sets WHERE document_id = ?1",
        params![document_id.to_string()],
    )?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn sample_set(document_id: Uuid) -> ExtractionSet {
        ExtractionSet {
            id: Uuid::new_v4(),
            document_id,
            extractions: vec![
                Extraction {
                    id: Uuid::new_v4().to_string(),
                    text: "For the avoidance of doubt,".into(),
                    page_number: 3,
                },
                Extraction {
                    id: Uuid::new_v4().to_string(),
                    text: "Subject to applicable laws and regulations,".into(),
                    page_number: 1,
                },
            ],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_and_fetch_preserves_insertion_order() {
        let conn = open_memory_database().unwrap();
        let document_id = Uuid::new_v4();
        let set = sample_set(document_id);
        insert_extraction_set(&conn, &set).unwrap();

        let fetched = get_extraction_set_by_document(&conn, &document_id)
            .unwrap()
            .unwrap();
        assert_eq!(fetched.extractions.len(), 2);
        // Insertion order, not page order
        assert_eq!(fetched.extractions[0].page_number, 3);
        assert_eq!(fetched.extractions[1].page_number, 1);
    }

    #[test]
    fn missing_set_returns_none() {
        let conn = open_memory_database().unwrap();
        let found = get_extraction_set_by_document(&conn, &Uuid::new_v4()).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn delete_cascades_items_and_is_idempotent() {
        let conn = open_memory_database().unwrap();
        let document_id = Uuid::new_v4();
        insert_extraction_set(&conn, &sample_set(document_id)).unwrap();

        assert_eq!(delete_extraction_set_by_document(&conn, &document_id).unwrap(), 1);
        assert_eq!(delete_extraction_set_by_document(&conn, &document_id).unwrap(), 0);

        let orphan_items: i64 = conn
            .query_row("SELECT COUNT(*) FROM extraction_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphan_items, 0);
    }

    #[test]
    fn second_set_for_same_document_is_rejected() {
        let conn = open_memory_database().unwrap();
        let document_id = Uuid::new_v4();
        insert_extraction_set(&conn, &sample_set(document_id)).unwrap();

        let err = insert_extraction_set(&conn, &sample_set(document_id)).unwrap_err();
        assert_eq!(err.unique_violation_field(), Some("document_id"));
    }
}
