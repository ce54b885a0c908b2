//! Error types for the admin binary.

use gather_core::PasswordHashError;
use gather_repository::{
    EventRepositoryError, FriendshipRepositoryError, IdentityRepositoryError,
};

/// Errors that can occur while preparing a database.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    Hash(#[from] PasswordHashError),

    /// Identity store error
    #[error("Identity store error: {0}")]
    IdentityStore(#[from] IdentityRepositoryError),

    /// Friendship store error
    #[error("Friendship store error: {0}")]
    FriendshipStore(#[from] FriendshipRepositoryError),

    /// Event store error
    #[error("Event store error: {0}")]
    EventStore(#[from] EventRepositoryError),
}

impl AdminError {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
