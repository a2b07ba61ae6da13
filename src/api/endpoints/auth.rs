//! `POST /api/auth/login`: credential verification and token issuance.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::{self, LoginResponse};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Verify credentials and return a session token plus the public user.
///
/// The body is parsed by hand so a malformed payload classifies as the
/// invalid-JSON row instead of the framework's default rejection.
pub async fn login(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let request: LoginRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::InvalidJson)?;

    let mut problems = Vec::new();
    if request.email.trim().is_empty() || !request.email.contains('@') {
        problems.push("Please enter a valid email");
    }
    if request.password.is_empty() {
        problems.push("Password is required");
    }
    if !problems.is_empty() {
        return Err(ApiError::BadRequest(problems.join(", ")));
    }

    let conn = ctx.open_db()?;
    let response = auth::login(
        &conn,
        &ctx.config.token_secret,
        &request.email,
        &request.password,
    )?;

    tracing::info!(email = %response.user.email, "Login succeeded");
    Ok(Json(response))
}
