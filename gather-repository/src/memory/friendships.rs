use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use gather_shared::types::{EdgePair, FriendEdge, Identity, IdentityId};

use super::MemoryState;
use crate::{FriendshipRepository, FriendshipRepositoryError};

pub struct MemoryFriendshipRepository {
    state: Arc<MemoryState>,
}

impl MemoryFriendshipRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }

    /// Resolve edge counterparts to identities, sorted by username like the
    /// SQL joins order their output.
    fn resolve(&self, ids: Vec<IdentityId>) -> Vec<Identity> {
        let identities = self.state.identities.read().unwrap();
        let mut resolved: Vec<Identity> = ids
            .into_iter()
            .filter_map(|id| identities.get(&id).cloned())
            .collect();
        resolved.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        resolved
    }
}

#[async_trait]
impl FriendshipRepository for MemoryFriendshipRepository {
    async fn edge_pair(
        &self,
        viewpoint: IdentityId,
        other: IdentityId,
    ) -> Result<EdgePair, FriendshipRepositoryError> {
        let edges = self.state.edges.read().unwrap();
        Ok(EdgePair {
            outgoing: edges.get(&(viewpoint, other)).cloned(),
            incoming: edges.get(&(other, viewpoint)).cloned(),
        })
    }

    async fn insert_pending(
        &self,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<(), FriendshipRepositoryError> {
        let mut edges = self.state.edges.write().unwrap();

        if edges.contains_key(&(source, target)) {
            return Err(FriendshipRepositoryError::DuplicateEdge { source, target });
        }

        edges.insert(
            (source, target),
            FriendEdge {
                source,
                target,
                confirmed: false,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn confirm(
        &self,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<(), FriendshipRepositoryError> {
        let mut edges = self.state.edges.write().unwrap();
        if let Some(edge) = edges.get_mut(&(source, target)) {
            edge.confirmed = true;
        }
        Ok(())
    }

    async fn delete_between(
        &self,
        a: IdentityId,
        b: IdentityId,
    ) -> Result<(), FriendshipRepositoryError> {
        let mut edges = self.state.edges.write().unwrap();
        edges.remove(&(a, b));
        edges.remove(&(b, a));
        Ok(())
    }

    async fn confirmed_friends_of(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError> {
        let counterparts: Vec<IdentityId> = {
            let edges = self.state.edges.read().unwrap();
            let mut seen = HashSet::new();
            edges
                .values()
                .filter(|e| e.confirmed)
                .filter_map(|e| {
                    if e.source == id {
                        Some(e.target)
                    } else if e.target == id {
                        Some(e.source)
                    } else {
                        None
                    }
                })
                .filter(|other| seen.insert(*other))
                .collect()
        };

        Ok(self.resolve(counterparts))
    }

    async fn pending_outgoing(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError> {
        let counterparts: Vec<IdentityId> = {
            let edges = self.state.edges.read().unwrap();
            edges
                .values()
                .filter(|e| !e.confirmed && e.source == id)
                .map(|e| e.target)
                .collect()
        };

        Ok(self.resolve(counterparts))
    }

    async fn pending_incoming(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError> {
        let counterparts: Vec<IdentityId> = {
            let edges = self.state.edges.read().unwrap();
            edges
                .values()
                .filter(|e| !e.confirmed && e.target == id)
                .map(|e| e.source)
                .collect()
        };

        Ok(self.resolve(counterparts))
    }
}
