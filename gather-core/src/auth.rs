//! Viewer-relative authorization predicates.
//!
//! Private fields are all-or-nothing: a gate failure is an error carried
//! back to the caller, never a silently filtered result.
use gather_shared::types::Identity;

use crate::context::RequestContext;
use crate::errors::DomainError;

/// Denial text for reading another identity's private fields.
pub(crate) const PRIVATE_DATA_DENIAL: &str = "You can only view your own data.";

/// Whether `viewer` may read `subject`'s private fields (email and the
/// friend lists).
///
/// Compares ids, not usernames, so a rename mid-request can never widen
/// access. Anonymous viewers see nothing private.
pub fn can_view_private_fields(viewer: Option<&Identity>, subject: &Identity) -> bool {
    viewer.is_some_and(|v| v.id == subject.id)
}

/// Resolves the signed-in viewer or refuses the operation with `denial`.
pub(crate) async fn require_viewer(
    ctx: &mut RequestContext,
    denial: &'static str,
) -> Result<Identity, DomainError> {
    match ctx.resolve_viewer().await? {
        Some(viewer) => Ok(viewer),
        None => Err(DomainError::Unauthenticated(denial)),
    }
}

/// Gates access to `subject`'s private fields on the resolved viewer.
pub(crate) async fn require_private_access(
    ctx: &mut RequestContext,
    subject: &Identity,
) -> Result<(), DomainError> {
    let viewer = ctx.resolve_viewer().await?;
    if can_view_private_fields(viewer.as_ref(), subject) {
        Ok(())
    } else {
        Err(DomainError::AccessDenied(PRIVATE_DATA_DENIAL))
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

    #[test]
    fn test_private_fields_are_viewer_relative() {
        let alice = make_identity("alice");
        let bob = make_identity("bob");

        assert!(can_view_private_fields(Some(&alice), &alice));
        assert!(!can_view_private_fields(Some(&bob), &alice));
        assert!(!can_view_private_fields(None, &alice));
    }

    #[tokio::test]
    async fn test_require_viewer_refuses_anonymous_sessions() {
        let backend = MemoryBackend::new();
        let mut ctx = RequestContext::new(backend.identities(), Session::new());

        let err = require_viewer(&mut ctx, "Anonymous users can't add friends")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Anonymous users can't add friends");
    }

    #[tokio::test]
    async fn test_require_viewer_resolves_the_session_identity() {
        let backend = MemoryBackend::new();
        let alice = make_identity("Alice");
        backend.identities().insert(&alice).await.unwrap();

        let mut ctx = RequestContext::new(backend.identities(), Session::signed_in("Alice"));

        let viewer = require_viewer(&mut ctx, "unused").await.unwrap();
        assert_eq!(viewer.id, alice.id);
    }

    #[tokio::test]
    async fn test_private_access_is_denied_to_others_and_anonymous() {
        let backend = MemoryBackend::new();
        let alice = make_identity("Alice");
        let bob = make_identity("Bob");
        backend.identities().insert(&alice).await.unwrap();
        backend.identities().insert(&bob).await.unwrap();

        let mut own = RequestContext::new(backend.identities(), Session::signed_in("Alice"));
        assert!(require_private_access(&mut own, &alice).await.is_ok());

        let mut other = RequestContext::new(backend.identities(), Session::signed_in("Bob"));
        let err = require_private_access(&mut other, &alice)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You can only view your own data.");

        let mut anon = RequestContext::new(backend.identities(), Session::new());
        let err = require_private_access(&mut anon, &alice).await.unwrap_err();
        assert_eq!(err.to_string(), "You can only view your own data.");
    }
}
