//! This module defines the `IdentityRepository` trait, which provides an interface
//! for interacting with the underlying data store for registered identities.
//! It abstracts the database operations for persistence and retrieval.
use gather_shared::types::{Identity, IdentityId, UsernameKey};

use crate::errors::IdentityRepositoryError;

/// A trait that defines the interface for interacting with the identity store.
///
/// Implementors enforce case-insensitive username uniqueness: two identities
/// whose usernames differ only in case cannot coexist, and lookups by
/// [`UsernameKey`] match regardless of the display casing on record.
#[async_trait::async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Persists a new identity.
    ///
    /// # Arguments
    ///
    /// * `identity` - The identity to insert, id and timestamps already set.
    ///
    /// # Returns
    ///
    /// A `Result` indicating success, `DuplicateUsername` when another
    /// identity already holds the same username key, or a database error.
    async fn insert(&self, identity: &Identity) -> Result<(), IdentityRepositoryError>;

    /// Updates an existing identity in full (username, email, password
    /// digest, updated-at timestamp) by id.
    ///
    /// # Arguments
    ///
    /// * `identity` - The identity carrying the new field values.
    ///
    /// # Returns
    ///
    /// A `Result` indicating success, `DuplicateUsername` when a rename
    /// collides with another identity, or a database error.
    async fn update(&self, identity: &Identity) -> Result<(), IdentityRepositoryError>;

    /// Looks up an identity by its normalized username key.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no identity holds the key; absence is not an error.
    async fn find_by_username(
        &self,
        key: &UsernameKey,
    ) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Looks up an identity by id.
    async fn find_by_id(&self, id: IdentityId)
        -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Returns the number of stored identities.
    async fn count(&self) -> Result<u64, IdentityRepositoryError>;
}
