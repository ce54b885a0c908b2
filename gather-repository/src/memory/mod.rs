//! In-memory repository backend for tests and local development.
//!
//! All three repositories share one [`MemoryBackend`] so joins (friend
//! lists carry full identities) see the same data, mirroring how the
//! PostgreSQL repositories share one database. Uniqueness rules are
//! enforced exactly like the SQL schema enforces them, so callers can
//! exercise the duplicate-username and duplicate-edge paths without a
//! server.
mod events;
mod friendships;
mod identities;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use gather_shared::types::{EventId, EventRecord, FriendEdge, Identity, IdentityId, Tag};

pub use events::MemoryEventRepository;
pub use friendships::MemoryFriendshipRepository;
pub use identities::MemoryIdentityRepository;

use crate::{EventRepository, FriendshipRepository, IdentityRepository};

/// Shared mutable state behind the in-memory repositories.
#[derive(Default)]
pub(crate) struct MemoryState {
    pub(crate) identities: RwLock<HashMap<IdentityId, Identity>>,
    /// Keyed by the ordered (source, target) pair, like the SQL primary key.
    pub(crate) edges: RwLock<HashMap<(IdentityId, IdentityId), FriendEdge>>,
    pub(crate) events: RwLock<HashMap<EventId, EventRecord>>,
    /// Keyed by lowercased tag name.
    pub(crate) tags: RwLock<HashMap<String, Tag>>,
}

/// Handle to one in-memory dataset; clone-cheap.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identities(&self) -> Arc<dyn IdentityRepository> {
        Arc::new(MemoryIdentityRepository::new(Arc::clone(&self.state)))
    }

    pub fn friendships(&self) -> Arc<dyn FriendshipRepository> {
        Arc::new(MemoryFriendshipRepository::new(Arc::clone(&self.state)))
    }

    pub fn events(&self) -> Arc<dyn EventRepository> {
        Arc::new(MemoryEventRepository::new(Arc::clone(&self.state)))
    }
}
