//! Credential service: login, token verification, and the idempotent
//! admin bootstrap run by the composition root.
//!
//! Password hashing happens here in the service layer, never inside the
//! storage layer's write path.

pub mod password;
pub mod token;

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::{NewUser, PublicUser, Role, User};

pub use token::Claims;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Uniform for unknown email and wrong password, so a caller cannot
    /// probe which accounts exist.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Validation Error")]
    Validation(BTreeMap<String, String>),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Verify credentials against the stored admin account and issue a
/// 24-hour session token.
pub fn login(
    conn: &Connection,
    secret: &str,
    email: &str,
    password: &str,
) -> Result<LoginResponse, AuthError> {
    let user = repository::find_user_by_email_and_role(conn, email, Role::Admin)?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password::verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(LoginResponse {
        token: token::sign(secret, &user),
        user: user.public(),
    })
}

/// Validate a session token. Pure: no storage access, no side effects.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    token::verify(secret, token)
}

/// Create an account, hashing the password first. Field validation
/// failures are reported as an aggregate field → message map.
pub fn create_user(conn: &Connection, new_user: &NewUser) -> Result<User, AuthError> {
    new_user.validate().map_err(AuthError::Validation)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: new_user.email.clone(),
        password_hash: password::hash_password(&new_user.password),
        name: new_user.name.clone(),
        role: new_user.role,
        created_at: now,
        updated_at: now,
    };
    repository::insert_user(conn, &user)?;
    Ok(user)
}

/// Seed values for the bootstrap admin account.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Ensure the admin account exists. Invoked once at process start by the
/// composition root; a second run with the same seed is a no-op.
pub fn bootstrap_admin(conn: &Connection, seed: &AdminSeed) -> Result<(), AuthError> {
    if repository::find_user_by_email(conn, &seed.email)?.is_some() {
        return Ok(());
    }

    let user = create_user(
        conn,
        &NewUser {
            email: seed.email.clone(),
            password: seed.password.clone(),
            name: seed.name.clone(),
            role: Role::Admin,
        },
    )?;
    tracing::info!(email = %user.email, "Admin account created");
    Ok(())
}
