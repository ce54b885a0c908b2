//! Idempotent demo dataset for local development.
//!
//! Every run converges on the same fixture: six named accounts, one
//! confirmed friendship plus one pending request, and two events owned by
//! Alice. Rows that already exist are left untouched, so the seeder is safe
//! to run against a database that has accumulated real data.

use std::sync::Arc;

use chrono::Utc;
use gather_core::PasswordHasher;
use gather_repository::{EventRepository, FriendshipRepository, IdentityRepository};
use gather_shared::types::{
    EventId, EventRecord, FriendshipState, Identity, IdentityId, Tag, Username, UsernameKey,
};
use tracing::info;

use crate::errors::AdminError;

/// The demo roster; each password is the lowercase name followed by "pass".
const DEMO_IDENTITIES: [&str; 6] = ["Alice", "Bob", "Charlie", "Dave", "Evette", "Frank"];

/// Alice ships with a contact address so the private-field paths have data.
const DEMO_EMAIL: &str = "alice@example.com";

/// What one seeding pass actually created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub identities_created: usize,
    pub friendships_created: usize,
    pub events_created: usize,
}

/// Loads the demo dataset, creating only what is missing.
pub async fn seed_demo_data(
    identities: Arc<dyn IdentityRepository>,
    friendships: Arc<dyn FriendshipRepository>,
    events: Arc<dyn EventRepository>,
    hasher: &dyn PasswordHasher,
) -> Result<SeedSummary, AdminError> {
    let mut summary = SeedSummary::default();

    let mut roster = Vec::with_capacity(DEMO_IDENTITIES.len());
    for name in DEMO_IDENTITIES {
        let (identity, created) = ensure_identity(&identities, hasher, name).await?;
        if created {
            summary.identities_created += 1;
        }
        roster.push(identity);
    }

    // Alice's email is part of the fixture even when her row already existed.
    let mut alice = roster[0].clone();
    if alice.email != DEMO_EMAIL {
        alice.email = DEMO_EMAIL.to_string();
        alice.updated_at = Utc::now();
        identities.update(&alice).await?;
    }
    let bob = &roster[1];
    let charlie = &roster[2];

    if ensure_edge(&friendships, alice.id, bob.id, true).await? {
        summary.friendships_created += 1;
    }
    if ensure_edge(&friendships, charlie.id, alice.id, false).await? {
        summary.friendships_created += 1;
    }

    let in_person = events.get_or_create_tag("in-person").await?;
    let online = events.get_or_create_tag("online").await?;
    let social = events.get_or_create_tag("social").await?;

    let existing = events.list_all().await?;
    let missing = |title: &str| !existing.iter().any(|event| event.title == title);

    if missing("Crafty Time") {
        insert_event(
            &events,
            &alice,
            "Crafty Time",
            "Let's meet up and make some stuff",
            vec![online, social.clone()],
        )
        .await?;
        summary.events_created += 1;
    }
    if missing("Karaoke") {
        insert_event(
            &events,
            &alice,
            "Karaoke",
            "Singalingalong",
            vec![in_person, social],
        )
        .await?;
        summary.events_created += 1;
    }

    info!(
        identities_created = summary.identities_created,
        friendships_created = summary.friendships_created,
        events_created = summary.events_created,
        "Demo data ensured"
    );

    Ok(summary)
}

/// Returns the identity for `name`, creating it with the demo password when
/// it does not exist yet. The bool reports whether a row was inserted.
async fn ensure_identity(
    identities: &Arc<dyn IdentityRepository>,
    hasher: &dyn PasswordHasher,
    name: &str,
) -> Result<(Identity, bool), AdminError> {
    if let Some(existing) = identities.find_by_username(&UsernameKey::new(name)).await? {
        return Ok((existing, false));
    }

    let now = Utc::now();
    let identity = Identity {
        id: IdentityId::random(),
        username: Username::new(name),
        email: String::new(),
        password_digest: hasher.hash(&format!("{}pass", name.to_lowercase()))?,
        created_at: now,
        updated_at: now,
    };
    identities.insert(&identity).await?;

    Ok((identity, true))
}

/// Records a friendship edge unless any edge already links the two
/// identities. The bool reports whether an edge was inserted.
async fn ensure_edge(
    friendships: &Arc<dyn FriendshipRepository>,
    source: IdentityId,
    target: IdentityId,
    confirmed: bool,
) -> Result<bool, AdminError> {
    let pair = friendships.edge_pair(source, target).await?;
    if pair.state() != FriendshipState::NoEdge {
        return Ok(false);
    }

    friendships.insert_pending(source, target).await?;
    if confirmed {
        friendships.confirm(source, target).await?;
    }

    Ok(true)
}

async fn insert_event(
    events: &Arc<dyn EventRepository>,
    owner: &Identity,
    title: &str,
    description: &str,
    tags: Vec<Tag>,
) -> Result<(), AdminError> {
    let now = Utc::now();
    let event = EventRecord {
        id: EventId::random(),
        title: title.to_string(),
        description: description.to_string(),
        owner: owner.id,
        tags,
        start_time: None,
        end_time: None,
        created_at: now,
        updated_at: now,
    };
    events.insert(&event).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use gather_core::PlainTextPasswordHasher;
    use gather_repository::MemoryBackend;
    use gather_shared::types::PasswordDigest;

    use super::*;

    async fn seed(backend: &MemoryBackend) -> SeedSummary {
        seed_demo_data(
            backend.identities(),
            backend.friendships(),
            backend.events(),
            &PlainTextPasswordHasher,
        )
        .await
        .unwrap()
    }

    async fn identity_named(backend: &MemoryBackend, name: &str) -> Identity {
        backend
            .identities()
            .find_by_username(&UsernameKey::new(name))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_seed_builds_the_demo_dataset() {
        let backend = MemoryBackend::new();

        let summary = seed(&backend).await;

        assert_eq!(
            summary,
            SeedSummary {
                identities_created: 6,
                friendships_created: 2,
                events_created: 2,
            }
        );

        let alice = identity_named(&backend, "alice").await;
        assert_eq!(alice.username.as_str(), "Alice");
        assert_eq!(alice.email, "alice@example.com");
        assert_eq!(alice.password_digest.as_str(), "alicepass");

        let bob = identity_named(&backend, "bob").await;
        let charlie = identity_named(&backend, "charlie").await;
        assert_eq!(bob.email, "");

        let friendships = backend.friendships();
        let alice_bob = friendships.edge_pair(alice.id, bob.id).await.unwrap();
        assert_eq!(alice_bob.state(), FriendshipState::Confirmed);
        let alice_charlie = friendships.edge_pair(alice.id, charlie.id).await.unwrap();
        assert_eq!(alice_charlie.state(), FriendshipState::PendingIncoming);
        let charlie_alice = friendships.edge_pair(charlie.id, alice.id).await.unwrap();
        assert_eq!(charlie_alice.state(), FriendshipState::PendingOutgoing);

        let listed = backend.events().list_all().await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|event| event.title.as_str()).collect();
        assert_eq!(titles, vec!["Crafty Time", "Karaoke"]);
        assert!(listed.iter().all(|event| event.owner == alice.id));

        let karaoke_tags: Vec<&str> = listed[1]
            .tags
            .iter()
            .map(|tag| tag.name.as_str())
            .collect();
        assert_eq!(karaoke_tags, vec!["in-person", "social"]);
    }

    #[tokio::test]
    async fn test_event_tags_share_one_row_per_name() {
        let backend = MemoryBackend::new();

        seed(&backend).await;

        let listed = backend.events().list_all().await.unwrap();
        let crafty_social = listed[0]
            .tags
            .iter()
            .find(|tag| tag.name == "social")
            .map(|tag| tag.id)
            .unwrap();
        let karaoke_social = listed[1]
            .tags
            .iter()
            .find(|tag| tag.name == "social")
            .map(|tag| tag.id)
            .unwrap();
        assert_eq!(crafty_social, karaoke_social);
    }

    #[tokio::test]
    async fn test_seeding_twice_changes_nothing() {
        let backend = MemoryBackend::new();

        seed(&backend).await;
        let second = seed(&backend).await;

        assert_eq!(second, SeedSummary::default());
        assert_eq!(backend.identities().count().await.unwrap(), 6);
        assert_eq!(backend.events().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seed_fills_gaps_without_touching_existing_rows() {
        let backend = MemoryBackend::new();

        let now = Utc::now();
        let bob = Identity {
            id: IdentityId::random(),
            username: Username::new("Bob"),
            email: "bob@example.net".to_string(),
            password_digest: PasswordDigest::new("a-real-password"),
            created_at: now,
            updated_at: now,
        };
        backend.identities().insert(&bob).await.unwrap();

        let summary = seed(&backend).await;

        assert_eq!(summary.identities_created, 5);
        assert_eq!(summary.friendships_created, 2);
        assert_eq!(summary.events_created, 2);

        let bob_after = identity_named(&backend, "bob").await;
        assert_eq!(bob_after.id, bob.id);
        assert_eq!(bob_after.password_digest.as_str(), "a-real-password");
        assert_eq!(bob_after.email, "bob@example.net");

        let alice = identity_named(&backend, "alice").await;
        let pair = backend
            .friendships()
            .edge_pair(alice.id, bob.id)
            .await
            .unwrap();
        assert_eq!(pair.state(), FriendshipState::Confirmed);
    }
}
