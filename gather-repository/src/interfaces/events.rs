//! This module defines the `EventRepository` trait for the event catalog
//! and its tags.
use gather_shared::types::{EventId, EventRecord, IdentityId, Tag};

use crate::errors::EventRepositoryError;

/// A trait that defines the interface for interacting with the event store.
#[async_trait::async_trait]
pub trait EventRepository: Send + Sync {
    /// Persists a new event together with its tag links.
    async fn insert(&self, event: &EventRecord) -> Result<(), EventRepositoryError>;

    /// Rewrites an event's fields and tag links by id.
    async fn update(&self, event: &EventRecord) -> Result<(), EventRepositoryError>;

    /// Looks up an event by id, tags included.
    async fn find_by_id(&self, id: EventId) -> Result<Option<EventRecord>, EventRepositoryError>;

    /// All events in creation order, tags included.
    async fn list_all(&self) -> Result<Vec<EventRecord>, EventRepositoryError>;

    /// Deletes an event if (and only if) `owner` owns it. Idempotent.
    async fn delete(&self, id: EventId, owner: IdentityId) -> Result<(), EventRepositoryError>;

    /// Finds a tag by name (case-insensitively) or creates it.
    async fn get_or_create_tag(&self, name: &str) -> Result<Tag, EventRepositoryError>;

    /// Returns the number of stored events.
    async fn count(&self) -> Result<u64, EventRepositoryError>;
}
