//! Stateless session tokens: a JSON claims payload signed with
//! HMAC-SHA256 under the process-wide secret.
//!
//! Wire format: `base64url(claims json) "." base64url(mac)`. There is no
//! server-side session state; expiry is the only invalidation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::AuthError;
use crate::models::{Role, User};

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime: 24 hours from issuance.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Signed token payload binding a principal's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// Expiry as unix seconds.
    pub exp: i64,
}

/// Issue a token for a user, expiring [`TOKEN_TTL_SECS`] from now.
pub fn sign(secret: &str, user: &User) -> String {
    let claims = Claims {
        id: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
    };
    sign_claims(secret, &claims)
}

fn sign_claims(secret: &str, claims: &Claims) -> String {
    let payload = URL_SAFE_NO_PAD
        .encode(serde_json::to_vec(claims).expect("claims serialize to JSON"));
    let mac = hmac_sha256(secret, payload.as_bytes());
    format!("{payload}.{}", URL_SAFE_NO_PAD.encode(mac))
}

/// Validate a token: signature, payload shape, and expiry. Every failure
/// mode collapses to [`AuthError::InvalidToken`].
pub fn verify(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::InvalidToken)?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AuthError::InvalidToken)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthError::InvalidToken)?;
    let claims: Claims =
        serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;

    if claims.exp <= Utc::now().timestamp() {
        return Err(AuthError::InvalidToken);
    }

    Ok(claims)
}

fn hmac_sha256(secret: &str, data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
