//! Error types for the identity repository.
//! Defines specific errors that can occur during database operations related to identities.
use gather_shared::types::UsernameKey;
use thiserror::Error;

/// Represents errors that can occur within the identity repository.
///
/// Username uniqueness is enforced at the store level (case-insensitively);
/// a violation surfaces as `DuplicateUsername` so callers can map it to the
/// user-facing duplicate error instead of crashing on a raw database error.
#[derive(Debug, Error)]
pub enum IdentityRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Username already taken: {0}")]
    DuplicateUsername(UsernameKey),
}
