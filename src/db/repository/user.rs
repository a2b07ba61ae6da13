use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Role, User};

const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id.to_string(),
            user.email,
            user.password_hash,
            user.name,
            user.role.as_str(),
            user.created_at,
            user.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    query_one(
        conn,
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id.to_string()],
    )
}

/// Lookup by email. The column's NOCASE collation makes the match
/// case-insensitive, matching the uniqueness rule.
pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    query_one(
        conn,
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
        params![email],
    )
}

/// Lookup restricted to a role, used by the login path.
pub fn find_user_by_email_and_role(
    conn: &Connection,
    email: &str,
    role: Role,
) -> Result<Option<User>, DatabaseError> {
    query_one(
        conn,
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 AND role = ?2"),
        params![email, role.as_str()],
    )
}

fn query_one(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let result = stmt.query_row(params, |row| {
        Ok(UserRow {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            name: row.get(3)?,
            role: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(user_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    Ok(User {
        id: Uuid::parse_str(&row.id).map_err(|_| DatabaseError::InvalidValue {
            field: "users.id".into(),
            value: row.id,
        })?,
        email: row.email,
        password_hash: row.password_hash,
        name: row.name,
        role: row.role.parse()?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
