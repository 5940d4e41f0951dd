//! Credential helpers: Argon2id password hashing and random token
//! generation for API keys and session cookies.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;

/// Generate a new API token.
///
/// 256 bits of randomness encoded as hexadecimal with a `csg_` prefix
/// for easy identification: `csg_{64 hex chars}` (68 characters total).
pub fn generate_api_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    format!("csg_{}", hex::encode(bytes))
}

/// Generate an opaque session token (64 hex characters).
pub fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Hash an admin password for storage using Argon2id.
///
/// Uses a cryptographically secure random salt and default parameters,
/// producing a PHC string suitable for the `password_hash` column.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only if the stored hash is
/// malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_format() {
        let token = generate_api_token();
        assert_eq!(token.len(), 68);
        assert!(token.starts_with("csg_"));
        assert!(token[4..].bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_api_token(), generate_api_token());
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("hunter2", "not-a-phc-string").is_err());
    }
}
