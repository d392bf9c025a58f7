//! Password hashing with bcrypt over a per-credential salt

use rand::rngs::OsRng;
use rand::TryRngCore;
use thiserror::Error;

use portal_shared::constants::SALT_SIZE_BYTES;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),
    #[error("Hash error: {0}")]
    Hash(String),
}

pub struct PasswordService;

impl PasswordService {
    /// Generates a fresh 128-bit salt from the OS RNG, hex-encoded.
    pub fn generate_salt() -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_SIZE_BYTES];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::RandomSource(e.to_string()))?;
        Ok(hex::encode(salt))
    }

    /// Hashes `password + salt` with bcrypt at the default cost factor.
    pub fn hash(password: &str, salt: &str) -> Result<String, PasswordError> {
        let combined = format!("{password}{salt}");
        bcrypt::hash(combined, bcrypt::DEFAULT_COST).map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Recomputes and compares against the stored hash.
    ///
    /// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
    pub fn verify(password: &str, salt: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let combined = format!("{password}{salt}");
        bcrypt::verify(combined, stored_hash).map_err(|e| PasswordError::Hash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_is_hex_and_unique() {
        let a = PasswordService::generate_salt().unwrap();
        let b = PasswordService::generate_salt().unwrap();
        assert_eq!(a.len(), SALT_SIZE_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_verify_round_trip() {
        let salt = PasswordService::generate_salt().unwrap();
        let hash = PasswordService::hash("pass1", &salt).unwrap();
        assert!(PasswordService::verify("pass1", &salt, &hash).unwrap());
        assert!(!PasswordService::verify("pass2", &salt, &hash).unwrap());
    }

    #[test]
    fn test_verify_with_wrong_salt_fails() {
        let salt = PasswordService::generate_salt().unwrap();
        let other = PasswordService::generate_salt().unwrap();
        let hash = PasswordService::hash("pass1", &salt).unwrap();
        assert!(!PasswordService::verify("pass1", &other, &hash).unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_error() {
        let salt = PasswordService::generate_salt().unwrap();
        assert!(PasswordService::verify("pass1", &salt, "not-a-bcrypt-hash").is_err());
    }
}
