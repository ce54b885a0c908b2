//! The event catalog: public listing, cached lookups and owner-scoped
//! writes.
use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use gather_repository::EventRepository;
use gather_shared::types::{EventDraft, EventId, EventRecord, Tag};
use tracing::{info, instrument};

use crate::auth::require_viewer;
use crate::context::{CachedEntity, EntityKey, RequestContext};
use crate::errors::DomainError;

/// Event catalog operations.
///
/// Listing and lookup are public; creating needs a signed-in viewer and
/// changing or deleting an event is reserved to its owner.
pub struct EventService {
    events: Arc<dyn EventRepository>,
}

impl EventService {
    /// Creates a new `EventService` over the given event store.
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    /// Every event, oldest first. Public.
    pub async fn list(&self) -> Result<Vec<EventRecord>, DomainError> {
        Ok(self.events.list_all().await?)
    }

    /// Looks an event up through the request cache.
    pub async fn get(
        &self,
        ctx: &mut RequestContext,
        id: EventId,
    ) -> Result<EventRecord, DomainError> {
        let events = Arc::clone(&self.events);
        let cached = ctx
            .lookup(EntityKey::Event(id), move || async move {
                events.find_by_id(id).await.map(CachedEntity::Event)
            })
            .await?;
        match cached {
            CachedEntity::Event(Some(event)) => Ok(event),
            _ => Err(DomainError::NotFound("Event not found")),
        }
    }

    /// Publishes a new event owned by the signed-in viewer.
    #[instrument(skip_all, fields(title = %draft.title))]
    pub async fn create(
        &self,
        ctx: &mut RequestContext,
        draft: EventDraft,
    ) -> Result<EventRecord, DomainError> {
        let viewer = require_viewer(ctx, "Anonymous users can't create events").await?;
        let tags = self.resolve_tags(&draft.tags).await?;

        let now = Utc::now();
        let event = EventRecord {
            id: EventId::random(),
            title: draft.title,
            description: draft.description,
            owner: viewer.id,
            tags,
            start_time: draft.start_time,
            end_time: draft.end_time,
            created_at: now,
            updated_at: now,
        };
        self.events.insert(&event).await?;

        info!(event = %event.id, owner = %event.owner, "event created");
        Ok(event)
    }

    /// Rewrites an event from the draft. Owner only.
    #[instrument(skip_all, fields(event = %id))]
    pub async fn update(
        &self,
        ctx: &mut RequestContext,
        id: EventId,
        draft: EventDraft,
    ) -> Result<EventRecord, DomainError> {
        let viewer = require_viewer(ctx, "Anonymous users can't update events").await?;
        let current = self.get(ctx, id).await?;
        if current.owner != viewer.id {
            return Err(DomainError::AccessDenied(
                "You can only update your own events",
            ));
        }

        let tags = self.resolve_tags(&draft.tags).await?;
        let event = EventRecord {
            id: current.id,
            title: draft.title,
            description: draft.description,
            owner: current.owner,
            tags,
            start_time: draft.start_time,
            end_time: draft.end_time,
            created_at: current.created_at,
            updated_at: Utc::now(),
        };
        self.events.update(&event).await?;

        info!(event = %event.id, "event updated");
        Ok(event)
    }

    /// Deletes the viewer's event. A non-owner delete (or a missing id)
    /// changes nothing and reports nothing.
    #[instrument(skip_all, fields(event = %id))]
    pub async fn delete(&self, ctx: &mut RequestContext, id: EventId) -> Result<(), DomainError> {
        let viewer = require_viewer(ctx, "Anonymous users can't delete events").await?;
        self.events.delete(id, viewer.id).await?;
        info!(event = %id, "event deleted");
        Ok(())
    }

    /// Resolves tag names to tags, creating missing ones. Case-insensitive
    /// duplicates in the draft collapse to the first spelling.
    async fn resolve_tags(&self, names: &[String]) -> Result<Vec<Tag>, DomainError> {
        let mut tags = Vec::new();
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.to_lowercase()) {
                continue;
            }
            tags.push(self.events.get_or_create_tag(name).await?);
        }
        Ok(tags)
    }
}
