//! Error types for the event repository.
use thiserror::Error;

/// Represents errors that can occur within the event repository.
#[derive(Debug, Error)]
pub enum EventRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
