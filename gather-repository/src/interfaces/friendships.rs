//! This module defines the `FriendshipRepository` trait, which provides an
//! interface for interacting with the directed friendship edges between
//! identities. It abstracts edge persistence, confirmation and traversal.
use gather_shared::types::{EdgePair, Identity, IdentityId};

use crate::errors::FriendshipRepositoryError;

/// A trait that defines the interface for interacting with the friendship
/// edge store.
///
/// Edges are directed: `source` proposed to `target`. The ordered pair is
/// unique. A friendship is established once a single edge (in either
/// direction) carries `confirmed = true`; implementors never hold a second
/// edge for a confirmed pair on the main code paths, but traversal methods
/// still deduplicate defensively because a double-pending race can leave
/// both directions populated.
#[async_trait::async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Fetches both possible directed edges between two identities in one
    /// round trip.
    ///
    /// # Arguments
    ///
    /// * `viewpoint` - The identity whose point of view orients the pair.
    /// * `other` - The counterpart identity.
    ///
    /// # Returns
    ///
    /// An [`EdgePair`] whose `outgoing` edge runs viewpoint → other and
    /// whose `incoming` edge runs other → viewpoint.
    async fn edge_pair(
        &self,
        viewpoint: IdentityId,
        other: IdentityId,
    ) -> Result<EdgePair, FriendshipRepositoryError>;

    /// Inserts an unconfirmed edge source → target.
    ///
    /// # Returns
    ///
    /// `DuplicateEdge` when the ordered pair already exists; this is the
    /// concurrency backstop for two simultaneous proposals.
    async fn insert_pending(
        &self,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<(), FriendshipRepositoryError>;

    /// Marks the edge source → target confirmed.
    ///
    /// Confirming an edge that no longer exists is a no-op: the edge may
    /// have been severed between the caller's read and this write.
    async fn confirm(
        &self,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<(), FriendshipRepositoryError>;

    /// Deletes the edge(s) between two identities in both directions.
    ///
    /// Idempotent: deleting an absent edge succeeds.
    async fn delete_between(
        &self,
        a: IdentityId,
        b: IdentityId,
    ) -> Result<(), FriendshipRepositoryError>;

    /// All identities sharing a confirmed edge with `id`, regardless of who
    /// proposed. No duplicates; ordered by username for stable output.
    async fn confirmed_friends_of(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError>;

    /// Identities `id` has proposed to that have not reciprocated yet.
    async fn pending_outgoing(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError>;

    /// Identities that have proposed to `id` and await a response.
    async fn pending_incoming(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError>;
}
