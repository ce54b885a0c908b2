//! Service wiring and per-request context construction.
use std::sync::Arc;

use gather_repository::{EventRepository, FriendshipRepository, IdentityRepository};

use crate::accounts::AccountService;
use crate::context::{RequestContext, Session};
use crate::events::EventService;
use crate::friends::FriendshipService;
use crate::password::PasswordHasher;

/// The resolver surface a transport embeds.
///
/// Bundles the three services over one set of stores. Per incoming
/// request: rebuild the [`Session`] from the transport's cookie, stamp a
/// [`RequestContext`] with [`Engine::context`], run operations, then hand
/// the session back with [`RequestContext::into_session`].
pub struct Engine {
    identities: Arc<dyn IdentityRepository>,
    accounts: AccountService,
    friends: FriendshipService,
    events: EventService,
}

impl Engine {
    /// Wires the services over the given stores and password strategy.
    ///
    /// The identity store is shared with every context the engine stamps
    /// out, so cached reads and service writes always see the same store.
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        friendships: Arc<dyn FriendshipRepository>,
        events: Arc<dyn EventRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            accounts: AccountService::new(Arc::clone(&identities), hasher),
            friends: FriendshipService::new(friendships),
            events: EventService::new(events),
            identities,
        }
    }

    /// A context for one request, carrying the transport's session.
    pub fn context(&self, session: Session) -> RequestContext {
        RequestContext::new(Arc::clone(&self.identities), session)
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn friends(&self) -> &FriendshipService {
        &self.friends
    }

    pub fn events(&self) -> &EventService {
        &self.events
    }
}
