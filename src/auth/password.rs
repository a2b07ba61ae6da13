//! Salted password hashing with PBKDF2-HMAC-SHA256.
//!
//! Stored format: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
//! The iteration count is part of the record, so it can be raised later
//! without invalidating existing credentials.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 32;
const HASH_LENGTH: usize = 32;

/// Hash a password under a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = generate_salt();
    let hash = derive(password, &salt, PBKDF2_ITERATIONS);
    format!(
        "pbkdf2-sha256${}${}${}",
        PBKDF2_ITERATIONS,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(hash),
    )
}

/// Check a candidate password against a stored hash string.
///
/// Unparseable stored values verify as `false` rather than erroring; a
/// corrupt credential must behave like a wrong password.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (scheme, iterations, salt, hash) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(scheme), Some(iter), Some(salt), Some(hash), None) => {
            (scheme, iter, salt, hash)
        }
        _ => return false,
    };
    if scheme != "pbkdf2-sha256" {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = URL_SAFE_NO_PAD.decode(salt) else {
        return false;
    };
    let Ok(expected) = URL_SAFE_NO_PAD.decode(hash) else {
        return false;
    };

    let candidate = derive(password, &salt, iterations);
    candidate.ct_eq(&expected).into()
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password("admin123");
        assert!(verify_password("admin123", &stored));
    }

    #[test]
    fn wrong_password_fails() {
        let stored = hash_password("admin123");
        assert!(!verify_password("admin124", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("admin123");
        let b = hash_password("admin123");
        assert_ne!(a, b);
        // Both still verify
        assert!(verify_password("admin123", &a));
        assert!(verify_password("admin123", &b));
    }

    #[test]
    fn malformed_stored_value_fails_closed() {
        assert!(!verify_password("admin123", ""));
        assert!(!verify_password("admin123", "plaintext"));
        assert!(!verify_password("admin123", "pbkdf2-sha256$abc$!!$!!"));
        assert!(!verify_password("admin123", "bcrypt$10$x$y"));
    }

    #[test]
    fn iteration_count_is_read_from_record() {
        // A record hashed under a lower count still verifies.
        let salt = [7u8; SALT_LENGTH];
        let hash = derive("pw-123", &salt, 1_000);
        let stored = format!(
            "pbkdf2-sha256$1000${}${}",
            URL_SAFE_NO_PAD.encode(salt),
            URL_SAFE_NO_PAD.encode(hash),
        );
        assert!(verify_password("pw-123", &stored));
        assert!(!verify_password("pw-124", &stored));
    }
}
