use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gather_shared::types::{Identity, IdentityId, PasswordDigest, Username, UsernameKey};
use uuid::Uuid;

use super::is_unique_violation;
use crate::{IdentityRepository, IdentityRepositoryError};

/// Flat row shape shared by every identity select, including the joined
/// selects in the friendship repository.
#[derive(sqlx::FromRow)]
pub(crate) struct IdentityRow {
    id: Uuid,
    username: String,
    email: String,
    password_digest: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            id: IdentityId::from(row.id),
            username: Username::new(row.username),
            email: row.email,
            password_digest: PasswordDigest::new(row.password_digest),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PostgresIdentityRepository {
    pool: sqlx::PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn insert(&self, identity: &Identity) -> Result<(), IdentityRepositoryError> {
        sqlx::query(
            "INSERT INTO identities (id, username, email, password_digest, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(identity.id.as_uuid())
        .bind(identity.username.as_str())
        .bind(&identity.email)
        .bind(identity.password_digest.as_str())
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                IdentityRepositoryError::DuplicateUsername(identity.username.key())
            } else {
                IdentityRepositoryError::DatabaseError(e)
            }
        })?;

        Ok(())
    }

    async fn update(&self, identity: &Identity) -> Result<(), IdentityRepositoryError> {
        sqlx::query(
            "UPDATE identities \
             SET username = $2, email = $3, password_digest = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(identity.id.as_uuid())
        .bind(identity.username.as_str())
        .bind(&identity.email)
        .bind(identity.password_digest.as_str())
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                IdentityRepositoryError::DuplicateUsername(identity.username.key())
            } else {
                IdentityRepositoryError::DatabaseError(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_username(
        &self,
        key: &UsernameKey,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let row: Option<IdentityRow> = sqlx::query_as(
            "SELECT id, username, email, password_digest, created_at, updated_at \
             FROM identities WHERE LOWER(username) = $1",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn find_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let row: Option<IdentityRow> = sqlx::query_as(
            "SELECT id, username, email, password_digest, created_at, updated_at \
             FROM identities WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn count(&self) -> Result<u64, IdentityRepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM identities")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}
