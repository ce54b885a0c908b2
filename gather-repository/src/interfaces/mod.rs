//! This module defines and re-exports the interfaces for the gather repositories.
//! It serves as a central point for accessing traits related to data interaction.
mod events;
mod friendships;
mod identities;

pub use events::EventRepository;
pub use friendships::FriendshipRepository;
pub use identities::IdentityRepository;
