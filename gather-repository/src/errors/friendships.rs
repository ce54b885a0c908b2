//! Error types for the friendship repository.
//! Defines specific errors that can occur during database operations related to friendship edges.
use gather_shared::types::IdentityId;
use thiserror::Error;

/// Represents errors that can occur within the friendship repository.
///
/// The ordered pair (source, target) is unique in the store; a violation
/// surfaces as `DuplicateEdge`, which is the backstop for two concurrent
/// proposals of the same edge.
#[derive(Debug, Error)]
pub enum FriendshipRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Edge already exists: {source} -> {target}")]
    DuplicateEdge {
        source: IdentityId,
        target: IdentityId,
    },
}
