//! The friendship ledger: directed proposals, reciprocal confirmation and
//! viewer-gated traversal.
use std::sync::Arc;

use gather_repository::{FriendshipRepository, FriendshipRepositoryError};
use gather_shared::types::{FriendshipState, Identity};
use tracing::{info, instrument};

use crate::auth::{require_private_access, require_viewer};
use crate::context::RequestContext;
use crate::errors::DomainError;

/// Friendship operations.
///
/// A friendship is a pair of identities connected by a single directed
/// edge; the edge starts unconfirmed (a request) and one reciprocal
/// proposal confirms it. Every mutation here is exactly one state
/// transition on the classified [`FriendshipState`] of the pair.
pub struct FriendshipService {
    friendships: Arc<dyn FriendshipRepository>,
}

impl FriendshipService {
    /// Creates a new `FriendshipService` over the given edge store.
    pub fn new(friendships: Arc<dyn FriendshipRepository>) -> Self {
        Self { friendships }
    }

    /// Proposes friendship from the signed-in viewer to `username`.
    ///
    /// One transition per call: a pending incoming edge gets confirmed
    /// (reciprocity), any other existing relationship is the duplicate
    /// error, and strangers get a fresh pending edge.
    #[instrument(skip_all, fields(target = %username))]
    pub async fn add_friend(
        &self,
        ctx: &mut RequestContext,
        username: &str,
    ) -> Result<(), DomainError> {
        let viewer = require_viewer(ctx, "Anonymous users can't add friends").await?;
        let target = match ctx.identity_by_username(username).await? {
            Some(target) => target,
            None => return Err(DomainError::NotFound("User not found")),
        };
        if target.id == viewer.id {
            return Err(DomainError::SelfFriend);
        }

        let pair = self.friendships.edge_pair(viewer.id, target.id).await?;
        match pair.state() {
            FriendshipState::PendingIncoming => {
                // The target asked first; this proposal answers it.
                self.friendships.confirm(target.id, viewer.id).await?;
                info!(source = %target.id, target = %viewer.id, "friendship confirmed");
                Ok(())
            }
            FriendshipState::PendingOutgoing | FriendshipState::Confirmed => {
                Err(DomainError::DuplicateRequest)
            }
            FriendshipState::NoEdge => {
                match self.friendships.insert_pending(viewer.id, target.id).await {
                    Ok(()) => {
                        info!(source = %viewer.id, target = %target.id, "friend request recorded");
                        Ok(())
                    }
                    // Lost a proposal race for the same edge.
                    Err(FriendshipRepositoryError::DuplicateEdge { .. }) => {
                        Err(DomainError::DuplicateRequest)
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Severs whatever exists between the viewer and `username`: pending
    /// requests in either direction, confirmed friendships, or nothing.
    /// Idempotent.
    #[instrument(skip_all, fields(target = %username))]
    pub async fn remove_friend(
        &self,
        ctx: &mut RequestContext,
        username: &str,
    ) -> Result<(), DomainError> {
        let viewer = require_viewer(ctx, "Anonymous users can't remove friends").await?;
        let target = match ctx.identity_by_username(username).await? {
            Some(target) => target,
            None => return Err(DomainError::NotFound("User not found")),
        };

        self.friendships
            .delete_between(viewer.id, target.id)
            .await?;
        info!(a = %viewer.id, b = %target.id, "friendship severed");
        Ok(())
    }

    /// `subject`'s confirmed friends. Private to the subject.
    pub async fn friends_of(
        &self,
        ctx: &mut RequestContext,
        subject: &Identity,
    ) -> Result<Vec<Identity>, DomainError> {
        require_private_access(ctx, subject).await?;
        Ok(self.friendships.confirmed_friends_of(subject.id).await?)
    }

    /// Identities `subject` has proposed to without an answer yet.
    /// Private to the subject.
    pub async fn pending_outgoing(
        &self,
        ctx: &mut RequestContext,
        subject: &Identity,
    ) -> Result<Vec<Identity>, DomainError> {
        require_private_access(ctx, subject).await?;
        Ok(self.friendships.pending_outgoing(subject.id).await?)
    }

    /// Identities waiting on an answer from `subject`. Private to the
    /// subject.
    pub async fn pending_incoming(
        &self,
        ctx: &mut RequestContext,
        subject: &Identity,
    ) -> Result<Vec<Identity>, DomainError> {
        require_private_access(ctx, subject).await?;
        Ok(self.friendships.pending_incoming(subject.id).await?)
    }

    /// Whether `subject` is a confirmed friend of the signed-in viewer.
    pub async fn is_friend(
        &self,
        ctx: &mut RequestContext,
        subject: &Identity,
    ) -> Result<bool, DomainError> {
        let viewer = require_viewer(ctx, "Anonymous has no friends").await?;
        let pair = self.friendships.edge_pair(viewer.id, subject.id).await?;
        Ok(pair.state() == FriendshipState::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use gather_repository::MemoryBackend;
    use gather_shared::types::{IdentityId, PasswordDigest, Username};

    use crate::context::Session;

    use super::*;

    fn make_identity(name: &str) -> Identity {
        let now = Utc::now();
        Identity {
            id: IdentityId::random(),
            username: Username::new(name),
            email: String::new(),
            password_digest: PasswordDigest::new("digest"),
            created_at: now,
            updated_at: now,
        }
    }

    async fn seed(backend: &MemoryBackend, names: &[&str]) -> Vec<Identity> {
        let mut identities = Vec::new();
        for name in names {
            let identity = make_identity(name);
            backend.identities().insert(&identity).await.unwrap();
            identities.push(identity);
        }
        identities
    }

    fn service(backend: &MemoryBackend) -> FriendshipService {
        FriendshipService::new(backend.friendships())
    }

    fn context(backend: &MemoryBackend, session: Session) -> RequestContext {
        RequestContext::new(backend.identities(), session)
    }

    fn usernames(identities: &[Identity]) -> Vec<&str> {
        identities.iter().map(|i| i.username.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_friend_requires_a_signed_in_viewer() {
        let backend = MemoryBackend::new();
        seed(&backend, &["alice"]).await;
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::new());
        let err = friends.add_friend(&mut ctx, "alice").await.unwrap_err();
        assert_eq!(err.to_string(), "Anonymous users can't add friends");
    }

    #[tokio::test]
    async fn test_add_friend_rejects_unknown_targets() {
        let backend = MemoryBackend::new();
        seed(&backend, &["alice"]).await;
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::signed_in("alice"));
        let err = friends.add_friend(&mut ctx, "ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_add_friend_rejects_yourself_in_any_casing() {
        let backend = MemoryBackend::new();
        seed(&backend, &["alice"]).await;
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::signed_in("alice"));
        let err = friends.add_friend(&mut ctx, "ALICE").await.unwrap_err();
        assert_eq!(err.to_string(), "You can't add yourself");
    }

    #[tokio::test]
    async fn test_add_friend_records_a_pending_request() {
        let backend = MemoryBackend::new();
        let seeded = seed(&backend, &["alice", "bob"]).await;
        let (alice, bob) = (&seeded[0], &seeded[1]);
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::signed_in("alice"));
        friends.add_friend(&mut ctx, "bob").await.unwrap();

        let outgoing = friends.pending_outgoing(&mut ctx, alice).await.unwrap();
        assert_eq!(usernames(&outgoing), vec!["bob"]);
        assert!(friends.friends_of(&mut ctx, alice).await.unwrap().is_empty());
        assert!(!friends.is_friend(&mut ctx, bob).await.unwrap());

        let mut bobs = context(&backend, Session::signed_in("bob"));
        let incoming = friends.pending_incoming(&mut bobs, bob).await.unwrap();
        assert_eq!(usernames(&incoming), vec!["alice"]);
        assert!(!friends.is_friend(&mut bobs, alice).await.unwrap());
    }

    #[tokio::test]
    async fn test_reciprocal_requests_confirm_the_friendship() {
        let backend = MemoryBackend::new();
        let seeded = seed(&backend, &["alice", "bob"]).await;
        let (alice, bob) = (&seeded[0], &seeded[1]);
        let friends = service(&backend);

        let mut alices = context(&backend, Session::signed_in("alice"));
        friends.add_friend(&mut alices, "bob").await.unwrap();

        let mut bobs = context(&backend, Session::signed_in("bob"));
        friends.add_friend(&mut bobs, "alice").await.unwrap();

        let of_alice = friends.friends_of(&mut alices, alice).await.unwrap();
        assert_eq!(usernames(&of_alice), vec!["bob"]);
        let of_bob = friends.friends_of(&mut bobs, bob).await.unwrap();
        assert_eq!(usernames(&of_bob), vec!["alice"]);

        assert!(friends.is_friend(&mut alices, bob).await.unwrap());
        assert!(friends.is_friend(&mut bobs, alice).await.unwrap());

        assert!(friends
            .pending_outgoing(&mut alices, alice)
            .await
            .unwrap()
            .is_empty());
        assert!(friends
            .pending_incoming(&mut bobs, bob)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_repeating_a_request_is_a_duplicate() {
        let backend = MemoryBackend::new();
        seed(&backend, &["alice", "bob"]).await;
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::signed_in("alice"));
        friends.add_friend(&mut ctx, "bob").await.unwrap();

        let err = friends.add_friend(&mut ctx, "bob").await.unwrap_err();
        assert_eq!(err.to_string(), "Friend request already sent");
    }

    #[tokio::test]
    async fn test_proposing_to_an_established_friend_is_a_duplicate() {
        let backend = MemoryBackend::new();
        seed(&backend, &["alice", "bob"]).await;
        let friends = service(&backend);

        let mut alices = context(&backend, Session::signed_in("alice"));
        friends.add_friend(&mut alices, "bob").await.unwrap();
        let mut bobs = context(&backend, Session::signed_in("bob"));
        friends.add_friend(&mut bobs, "alice").await.unwrap();

        // Either side trying again hits the same wall.
        let mut alices = context(&backend, Session::signed_in("alice"));
        let err = friends.add_friend(&mut alices, "bob").await.unwrap_err();
        assert_eq!(err.to_string(), "Friend request already sent");

        let mut bobs = context(&backend, Session::signed_in("bob"));
        let err = friends.add_friend(&mut bobs, "alice").await.unwrap_err();
        assert_eq!(err.to_string(), "Friend request already sent");
    }

    #[tokio::test]
    async fn test_remove_friend_requires_a_signed_in_viewer() {
        let backend = MemoryBackend::new();
        seed(&backend, &["alice"]).await;
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::new());
        let err = friends.remove_friend(&mut ctx, "alice").await.unwrap_err();
        assert_eq!(err.to_string(), "Anonymous users can't remove friends");
    }

    #[tokio::test]
    async fn test_remove_friend_rejects_unknown_targets() {
        let backend = MemoryBackend::new();
        seed(&backend, &["alice"]).await;
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::signed_in("alice"));
        let err = friends.remove_friend(&mut ctx, "ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_remove_friend_severs_from_either_side_and_is_idempotent() {
        let backend = MemoryBackend::new();
        let seeded = seed(&backend, &["alice", "bob"]).await;
        let (alice, bob) = (&seeded[0], &seeded[1]);
        let friends = service(&backend);

        let mut alices = context(&backend, Session::signed_in("alice"));
        friends.add_friend(&mut alices, "bob").await.unwrap();
        let mut bobs = context(&backend, Session::signed_in("bob"));
        friends.add_friend(&mut bobs, "alice").await.unwrap();

        // Bob severs even though Alice proposed.
        friends.remove_friend(&mut bobs, "alice").await.unwrap();

        assert!(friends.friends_of(&mut bobs, bob).await.unwrap().is_empty());
        assert!(friends
            .friends_of(&mut alices, alice)
            .await
            .unwrap()
            .is_empty());

        // Severing again, or severing a stranger, is fine.
        friends.remove_friend(&mut bobs, "alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_friend_cancels_a_pending_request() {
        let backend = MemoryBackend::new();
        let seeded = seed(&backend, &["alice", "bob"]).await;
        let alice = &seeded[0];
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::signed_in("alice"));
        friends.add_friend(&mut ctx, "bob").await.unwrap();
        friends.remove_friend(&mut ctx, "bob").await.unwrap();

        assert!(friends
            .pending_outgoing(&mut ctx, alice)
            .await
            .unwrap()
            .is_empty());

        // The slate is clean; a new request goes through.
        friends.add_friend(&mut ctx, "bob").await.unwrap();
    }

    #[tokio::test]
    async fn test_friend_lists_are_private_to_the_subject() {
        let backend = MemoryBackend::new();
        let seeded = seed(&backend, &["alice", "bob"]).await;
        let alice = &seeded[0];
        let friends = service(&backend);

        let mut bobs = context(&backend, Session::signed_in("bob"));
        let err = friends.friends_of(&mut bobs, alice).await.unwrap_err();
        assert_eq!(err.to_string(), "You can only view your own data.");
        let err = friends
            .pending_outgoing(&mut bobs, alice)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You can only view your own data.");
        let err = friends
            .pending_incoming(&mut bobs, alice)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You can only view your own data.");

        let mut anon = context(&backend, Session::new());
        let err = friends.friends_of(&mut anon, alice).await.unwrap_err();
        assert_eq!(err.to_string(), "You can only view your own data.");
    }

    #[tokio::test]
    async fn test_is_friend_requires_a_signed_in_viewer() {
        let backend = MemoryBackend::new();
        let seeded = seed(&backend, &["alice"]).await;
        let alice = &seeded[0];
        let friends = service(&backend);

        let mut ctx = context(&backend, Session::new());
        let err = friends.is_friend(&mut ctx, alice).await.unwrap_err();
        assert_eq!(err.to_string(), "Anonymous has no friends");
    }
}
