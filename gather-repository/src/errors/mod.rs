//! Error types for the gather repositories.
//! Consolidates and re-exports error types related to repository operations.
mod events;
mod friendships;
mod identities;

pub use events::EventRepositoryError;
pub use friendships::FriendshipRepositoryError;
pub use identities::IdentityRepositoryError;
