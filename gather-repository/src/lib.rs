//! # Gather Repository
//! This crate provides traits and implementations for interacting with the
//! gather data repositories (identities, friendship edges, events). It
//! includes definitions for errors, interfaces, a concrete implementation
//! for PostgreSQL, and an in-memory backend for tests and local development.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::{EventRepositoryError, FriendshipRepositoryError, IdentityRepositoryError};
pub use interfaces::{EventRepository, FriendshipRepository, IdentityRepository};
pub use memory::MemoryBackend;
pub use postgres::{
    PostgresEventRepository, PostgresFriendshipRepository, PostgresIdentityRepository, MIGRATOR,
};
