//! PostgreSQL implementations of the gather repositories.
//!
//! All queries use the runtime API (`sqlx::query`, `sqlx::query_as` with
//! `FromRow` structs) so the crate builds without a live database. Write
//! sequences touching more than one row run inside a transaction; nothing
//! partially applied is ever observable.
mod events;
mod friendships;
mod identities;

pub use events::PostgresEventRepository;
pub use friendships::PostgresFriendshipRepository;
pub use identities::PostgresIdentityRepository;

/// Embedded schema migrations, applied by the admin binary (and by the
/// ignored integration tests) before any repository runs.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("src/postgres/migrations");

/// True when the error is the unique-constraint violation class; used to
/// translate duplicate usernames and duplicate edges into typed errors.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
