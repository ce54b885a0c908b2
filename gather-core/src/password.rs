//! Password hashing strategies.
//!
//! The domain never stores or compares plaintext passwords; services go
//! through [`PasswordHasher`] so the algorithm stays swappable and tests
//! can run without paying for a real key derivation.
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use gather_shared::types::PasswordDigest;
use thiserror::Error;

/// Represents errors that can occur while hashing a password.
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Hashing failed: {0}")]
    Hashing(String),
}

/// A trait that defines the interface for hashing and verifying passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into a storable digest.
    fn hash(&self, plaintext: &str) -> Result<PasswordDigest, PasswordHashError>;

    /// Checks a plaintext password against a stored digest.
    ///
    /// Verification failures and malformed digests both come back `false`;
    /// callers only learn that the credentials did not match.
    fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool;
}

/// Argon2id hasher. The digest is a self-describing PHC string carrying
/// the algorithm, its parameters and the salt, so parameter upgrades keep
/// old digests verifiable.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordDigest, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::Hashing(e.to_string()))?;
        Ok(PasswordDigest::new(digest.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool {
        match PasswordHash::new(digest.as_str()) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Stores the plaintext as the digest.
///
/// For tests and local development only; never wire this into a deployment.
#[derive(Debug, Clone, Default)]
pub struct PlainTextPasswordHasher;

impl PasswordHasher for PlainTextPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordDigest, PasswordHashError> {
        Ok(PasswordDigest::new(plaintext))
    }

    fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool {
        plaintext == digest.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2_round_trip() {
        let hasher = Argon2PasswordHasher;
        let digest = hasher.hash("hunter2").unwrap();

        assert!(hasher.verify("hunter2", &digest));
        assert!(!hasher.verify("hunter3", &digest));
    }

    #[test]
    fn test_argon2_salts_every_digest() {
        let hasher = Argon2PasswordHasher;
        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_argon2_rejects_malformed_digest() {
        let hasher = Argon2PasswordHasher;
        let digest = PasswordDigest::new("not a phc string");

        assert!(!hasher.verify("anything", &digest));
    }

    #[test]
    fn test_plaintext_hasher_compares_directly() {
        let hasher = PlainTextPasswordHasher;
        let digest = hasher.hash("open sesame").unwrap();

        assert_eq!(digest.as_str(), "open sesame");
        assert!(hasher.verify("open sesame", &digest));
        assert!(!hasher.verify("open says me", &digest));
    }
}
