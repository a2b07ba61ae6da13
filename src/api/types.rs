//! Shared types for the API layer.

use std::sync::Arc;

use rusqlite::Connection;
use uuid::Uuid;

use crate::config::Config;
use crate::db::{self, DatabaseError};
use crate::models::Role;

/// Shared context for all routes and middleware. Cheap to clone; a fresh
/// database connection is opened per request through it.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<Config>,
}

impl ApiContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.config.db_path())
    }
}

/// The authenticated principal, resolved by the auth middleware and
/// inserted into request extensions for downstream handlers. Carries no
/// credential material.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}
