//! Per-request state: session view, entity cache and resolved viewer.
//!
//! A [`RequestContext`] lives for exactly one request. Every identity and
//! event read inside the request funnels through its cache, so the request
//! observes one consistent snapshot of each entity and the store is hit at
//! most once per key, however many operations and field resolutions the
//! request fans out into.
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use gather_repository::{IdentityRepository, IdentityRepositoryError};
use gather_shared::types::{EventId, EventRecord, Identity, UsernameKey};

/// The transport's session state, as the engine sees it.
///
/// Transports (an HTTP cookie layer, a test harness) own the storage; the
/// engine reads the signed-in username here and records sign-ins,
/// sign-outs and renames. `permanent` is a lifetime hint for cookie-style
/// transports: explicit logins set it, registrations do not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    username: Option<String>,
    permanent: bool,
}

impl Session {
    /// An anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already signed in as `username`, as a transport rebuilds
    /// it from its cookie at the start of a request.
    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            permanent: false,
        }
    }

    /// The signed-in username, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    /// Signs the session in as `username`.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    /// Asks the transport to keep the session beyond the browser session.
    pub fn make_permanent(&mut self) {
        self.permanent = true;
    }

    /// Signs the session out. Idempotent.
    pub fn clear_username(&mut self) {
        self.username = None;
    }
}

/// Cache key: the entity kind plus its natural lookup key.
///
/// Keys are typed rather than formatted strings, so the two namespaces can
/// never collide and a username is normalized exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Identity(UsernameKey),
    Event(EventId),
}

/// A memoized lookup result.
///
/// Absence is a result too: a key that resolved to nothing stays resolved
/// to nothing for the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedEntity {
    Identity(Option<Identity>),
    Event(Option<EventRecord>),
}

/// State scoped to a single request.
///
/// Confined to the task serving the request; no internal locking. Create
/// one per request with [`crate::Engine::context`] and hand the session
/// back to the transport with [`RequestContext::into_session`] when done.
pub struct RequestContext {
    identities: Arc<dyn IdentityRepository>,
    session: Session,
    cache: HashMap<EntityKey, CachedEntity>,
    viewer: Option<Option<Identity>>,
}

impl RequestContext {
    pub fn new(identities: Arc<dyn IdentityRepository>, session: Session) -> Self {
        Self {
            identities,
            session,
            cache: HashMap::new(),
            viewer: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Consumes the context and hands the (possibly mutated) session back
    /// to the transport.
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Looks `key` up in the cache, running `loader` only on a miss.
    ///
    /// The loader runs at most once per key per request. Later calls see
    /// the memoized value even if the store changed in the meantime;
    /// requests read a stable snapshot, never a fresher one.
    pub async fn lookup<F, Fut, E>(&mut self, key: EntityKey, loader: F) -> Result<CachedEntity, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedEntity, E>>,
    {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }
        let loaded = loader().await?;
        self.cache.insert(key, loaded.clone());
        Ok(loaded)
    }

    /// Cached identity lookup by username, case-insensitively.
    pub async fn identity_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let key = UsernameKey::new(username);
        let identities = Arc::clone(&self.identities);
        let cached = self
            .lookup(EntityKey::Identity(key.clone()), move || async move {
                identities
                    .find_by_username(&key)
                    .await
                    .map(CachedEntity::Identity)
            })
            .await?;
        match cached {
            CachedEntity::Identity(identity) => Ok(identity),
            // Identity keys only ever memoize identity values.
            CachedEntity::Event(_) => Ok(None),
        }
    }

    /// The identity behind the session, memoized for the request.
    ///
    /// Anonymous sessions and sessions naming an identity that no longer
    /// exists both resolve to `None`.
    pub async fn resolve_viewer(&mut self) -> Result<Option<Identity>, IdentityRepositoryError> {
        if let Some(viewer) = &self.viewer {
            return Ok(viewer.clone());
        }
        let resolved = match self.session.username().map(str::to_owned) {
            Some(username) => self.identity_by_username(&username).await?,
            None => None,
        };
        self.viewer = Some(resolved.clone());
        Ok(resolved)
    }
}
