//! Integration tests for the PostgreSQL repository implementations.
//!
//! These tests require a real PostgreSQL database; they are ignored by
//! default so the suite stays green without one.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_repositories -- --ignored`

use chrono::Utc;
use gather_repository::{
    FriendshipRepositoryError, IdentityRepositoryError, PostgresEventRepository,
    PostgresFriendshipRepository, PostgresIdentityRepository, MIGRATOR,
};
use gather_repository::{EventRepository, FriendshipRepository, IdentityRepository};
use gather_shared::types::{
    EventId, EventRecord, Identity, IdentityId, PasswordDigest, Username, UsernameKey,
};
use uuid::Uuid;

/// Connects to `DATABASE_URL` and applies migrations.
async fn pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to PostgreSQL");
    MIGRATOR.run(&pool).await.expect("migrations failed");
    pool
}

/// Creates a test identity with a collision-proof username.
fn make_identity(prefix: &str) -> Identity {
    let now = Utc::now();
    Identity {
        id: IdentityId::random(),
        username: Username::new(format!("{prefix}_{}", Uuid::new_v4().simple())),
        email: String::new(),
        password_digest: PasswordDigest::new("digest"),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn test_identity_round_trip_and_case_insensitive_uniqueness() {
    let pool = pool().await;
    let repository = PostgresIdentityRepository::new(pool);

    let alice = make_identity("Alice");
    repository.insert(&alice).await.unwrap();

    // Lookup matches regardless of casing.
    let upper = UsernameKey::new(&alice.username.as_str().to_uppercase());
    let found = repository.find_by_username(&upper).await.unwrap().unwrap();
    assert_eq!(found.id, alice.id);
    assert_eq!(found.username, alice.username);

    // A re-cased duplicate hits the unique index.
    let mut copycat = make_identity("copycat");
    copycat.username = Username::new(alice.username.as_str().to_uppercase());
    let result = repository.insert(&copycat).await;
    assert!(matches!(
        result,
        Err(IdentityRepositoryError::DuplicateUsername(_))
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn test_edge_lifecycle() {
    let pool = pool().await;
    let identities = PostgresIdentityRepository::new(pool.clone());
    let friendships = PostgresFriendshipRepository::new(pool);

    let alice = make_identity("alice");
    let bob = make_identity("bob");
    identities.insert(&alice).await.unwrap();
    identities.insert(&bob).await.unwrap();

    friendships.insert_pending(alice.id, bob.id).await.unwrap();
    let result = friendships.insert_pending(alice.id, bob.id).await;
    assert!(matches!(
        result,
        Err(FriendshipRepositoryError::DuplicateEdge { .. })
    ));

    let pair = friendships.edge_pair(bob.id, alice.id).await.unwrap();
    assert!(pair.incoming.is_some_and(|e| !e.confirmed));

    friendships.confirm(alice.id, bob.id).await.unwrap();
    let of_bob = friendships.confirmed_friends_of(bob.id).await.unwrap();
    assert!(of_bob.iter().any(|i| i.id == alice.id));

    friendships.delete_between(bob.id, alice.id).await.unwrap();
    friendships.delete_between(bob.id, alice.id).await.unwrap();
    let pair = friendships.edge_pair(alice.id, bob.id).await.unwrap();
    assert!(pair.outgoing.is_none() && pair.incoming.is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn test_event_and_tag_round_trip() {
    let pool = pool().await;
    let identities = PostgresIdentityRepository::new(pool.clone());
    let events = PostgresEventRepository::new(pool);

    let owner = make_identity("owner");
    identities.insert(&owner).await.unwrap();

    let tag_name = format!("tag_{}", Uuid::new_v4().simple());
    let tag = events.get_or_create_tag(&tag_name).await.unwrap();
    let again = events
        .get_or_create_tag(&tag_name.to_uppercase())
        .await
        .unwrap();
    assert_eq!(tag.id, again.id);

    let now = Utc::now();
    let record = EventRecord {
        id: EventId::random(),
        title: "Crafty Time".to_string(),
        description: "Bring a craft!".to_string(),
        owner: owner.id,
        tags: vec![tag.clone()],
        start_time: None,
        end_time: None,
        created_at: now,
        updated_at: now,
    };
    events.insert(&record).await.unwrap();

    let stored = events.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Crafty Time");
    assert_eq!(stored.tags, vec![tag]);

    // Owner-scoped delete: a stranger's attempt is a no-op.
    events.delete(record.id, IdentityId::random()).await.unwrap();
    assert!(events.find_by_id(record.id).await.unwrap().is_some());
    events.delete(record.id, owner.id).await.unwrap();
    assert!(events.find_by_id(record.id).await.unwrap().is_none());
}
