use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gather_shared::types::{EdgePair, FriendEdge, Identity, IdentityId};
use uuid::Uuid;

use super::identities::IdentityRow;
use super::is_unique_violation;
use crate::{FriendshipRepository, FriendshipRepositoryError};

#[derive(sqlx::FromRow)]
struct EdgeRow {
    source_id: Uuid,
    target_id: Uuid,
    confirmed: bool,
    created_at: DateTime<Utc>,
}

impl From<EdgeRow> for FriendEdge {
    fn from(row: EdgeRow) -> Self {
        FriendEdge {
            source: IdentityId::from(row.source_id),
            target: IdentityId::from(row.target_id),
            confirmed: row.confirmed,
            created_at: row.created_at,
        }
    }
}

pub struct PostgresFriendshipRepository {
    pool: sqlx::PgPool,
}

impl PostgresFriendshipRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendshipRepository for PostgresFriendshipRepository {
    async fn edge_pair(
        &self,
        viewpoint: IdentityId,
        other: IdentityId,
    ) -> Result<EdgePair, FriendshipRepositoryError> {
        let rows: Vec<EdgeRow> = sqlx::query_as(
            "SELECT source_id, target_id, confirmed, created_at FROM friend_edges \
             WHERE (source_id = $1 AND target_id = $2) OR (source_id = $2 AND target_id = $1)",
        )
        .bind(viewpoint.as_uuid())
        .bind(other.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut pair = EdgePair::default();
        for row in rows {
            let edge = FriendEdge::from(row);
            if edge.source == viewpoint {
                pair.outgoing = Some(edge);
            } else {
                pair.incoming = Some(edge);
            }
        }

        Ok(pair)
    }

    async fn insert_pending(
        &self,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<(), FriendshipRepositoryError> {
        sqlx::query(
            "INSERT INTO friend_edges (source_id, target_id, confirmed, created_at) \
             VALUES ($1, $2, FALSE, $3)",
        )
        .bind(source.as_uuid())
        .bind(target.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                FriendshipRepositoryError::DuplicateEdge { source, target }
            } else {
                FriendshipRepositoryError::DatabaseError(e)
            }
        })?;

        Ok(())
    }

    async fn confirm(
        &self,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<(), FriendshipRepositoryError> {
        // Zero rows affected means the edge was severed since the caller's
        // read; that is not an error.
        sqlx::query(
            "UPDATE friend_edges SET confirmed = TRUE WHERE source_id = $1 AND target_id = $2",
        )
        .bind(source.as_uuid())
        .bind(target.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_between(
        &self,
        a: IdentityId,
        b: IdentityId,
    ) -> Result<(), FriendshipRepositoryError> {
        sqlx::query(
            "DELETE FROM friend_edges \
             WHERE (source_id = $1 AND target_id = $2) OR (source_id = $2 AND target_id = $1)",
        )
        .bind(a.as_uuid())
        .bind(b.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn confirmed_friends_of(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError> {
        // UNION deduplicates the (rare) state where both directions hold a
        // confirmed edge.
        let rows: Vec<IdentityRow> = sqlx::query_as(
            "SELECT i.id, i.username, i.email, i.password_digest, i.created_at, i.updated_at \
             FROM friend_edges fe JOIN identities i ON i.id = fe.target_id \
             WHERE fe.source_id = $1 AND fe.confirmed \
             UNION \
             SELECT i.id, i.username, i.email, i.password_digest, i.created_at, i.updated_at \
             FROM friend_edges fe JOIN identities i ON i.id = fe.source_id \
             WHERE fe.target_id = $1 AND fe.confirmed \
             ORDER BY username",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Identity::from).collect())
    }

    async fn pending_outgoing(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError> {
        let rows: Vec<IdentityRow> = sqlx::query_as(
            "SELECT i.id, i.username, i.email, i.password_digest, i.created_at, i.updated_at \
             FROM friend_edges fe JOIN identities i ON i.id = fe.target_id \
             WHERE fe.source_id = $1 AND NOT fe.confirmed \
             ORDER BY i.username",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Identity::from).collect())
    }

    async fn pending_incoming(
        &self,
        id: IdentityId,
    ) -> Result<Vec<Identity>, FriendshipRepositoryError> {
        let rows: Vec<IdentityRow> = sqlx::query_as(
            "SELECT i.id, i.username, i.email, i.password_digest, i.created_at, i.updated_at \
             FROM friend_edges fe JOIN identities i ON i.id = fe.source_id \
             WHERE fe.target_id = $1 AND NOT fe.confirmed \
             ORDER BY i.username",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Identity::from).collect())
    }
}
