//! Error types for the domain services.
//!
//! The `Display` strings of the fixed-text variants are returned to end
//! users verbatim by whatever transport embeds the engine, so they are part
//! of the public contract and must not drift.
use gather_repository::{
    EventRepositoryError, FriendshipRepositoryError, IdentityRepositoryError,
};
use thiserror::Error;

use crate::password::PasswordHashError;

/// Represents errors that can occur in the domain services.
///
/// The first group carries fixed user-facing texts; the second wraps
/// infrastructure failures from the stores and the password hasher.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An operation that needs a signed-in viewer ran anonymously. The text
    /// names the operation that was refused.
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// A referenced identity or event does not exist.
    #[error("{0}")]
    NotFound(&'static str),

    /// The requested username is already held by another identity. The text
    /// depends on whether it was a registration or a rename.
    #[error("{0}")]
    DuplicateUsername(&'static str),

    /// A friend request towards that identity is already on record.
    #[error("Friend request already sent")]
    DuplicateRequest,

    /// An identity proposed friendship to itself.
    #[error("You can't add yourself")]
    SelfFriend,

    /// The supplied current password failed verification.
    #[error("Current password incorrect")]
    BadCredentials,

    /// The requested username breaks a format rule.
    #[error("{0}")]
    InvalidUsername(&'static str),

    /// The requested password is unusable.
    #[error("Bad password")]
    InvalidPassword,

    /// The viewer may not read or change the addressed data.
    #[error("{0}")]
    AccessDenied(&'static str),

    /// Password hashing infrastructure failed.
    #[error("Password hashing failed: {0}")]
    Hash(#[from] PasswordHashError),

    /// The identity store failed.
    #[error("Identity store error: {0}")]
    IdentityStore(#[from] IdentityRepositoryError),

    /// The friendship store failed.
    #[error("Friendship store error: {0}")]
    FriendshipStore(#[from] FriendshipRepositoryError),

    /// The event store failed.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventRepositoryError),
}
