use std::sync::Arc;

use async_trait::async_trait;
use gather_shared::types::{EventId, EventRecord, IdentityId, Tag, TagId};

use super::MemoryState;
use crate::{EventRepository, EventRepositoryError};

pub struct MemoryEventRepository {
    state: Arc<MemoryState>,
}

impl MemoryEventRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn insert(&self, event: &EventRecord) -> Result<(), EventRepositoryError> {
        let mut events = self.state.events.write().unwrap();
        events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update(&self, event: &EventRecord) -> Result<(), EventRepositoryError> {
        let mut events = self.state.events.write().unwrap();
        // A vanished row is a no-op, like an UPDATE matching zero rows.
        if events.contains_key(&event.id) {
            events.insert(event.id, event.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<EventRecord>, EventRepositoryError> {
        let events = self.state.events.read().unwrap();
        Ok(events.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<EventRecord>, EventRepositoryError> {
        let events = self.state.events.read().unwrap();
        let mut listed: Vec<EventRecord> = events.values().cloned().collect();
        listed.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(listed)
    }

    async fn delete(&self, id: EventId, owner: IdentityId) -> Result<(), EventRepositoryError> {
        let mut events = self.state.events.write().unwrap();
        if events.get(&id).is_some_and(|e| e.owner == owner) {
            events.remove(&id);
        }
        Ok(())
    }

    async fn get_or_create_tag(&self, name: &str) -> Result<Tag, EventRepositoryError> {
        let mut tags = self.state.tags.write().unwrap();
        let tag = tags
            .entry(name.to_lowercase())
            .or_insert_with(|| Tag {
                id: TagId::random(),
                name: name.to_string(),
            })
            .clone();
        Ok(tag)
    }

    async fn count(&self) -> Result<u64, EventRepositoryError> {
        let events = self.state.events.read().unwrap();
        Ok(events.len() as u64)
    }
}
