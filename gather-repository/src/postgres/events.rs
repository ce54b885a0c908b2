use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gather_shared::types::{EventId, EventRecord, IdentityId, Tag, TagId};
use uuid::Uuid;

use crate::{EventRepository, EventRepositoryError};

/// One row of the event/tag left join; `tag_id`/`tag_name` are NULL for
/// untagged events.
#[derive(sqlx::FromRow)]
struct EventTagRow {
    id: Uuid,
    title: String,
    description: String,
    owner_id: Uuid,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    tag_id: Option<Uuid>,
    tag_name: Option<String>,
}

const EVENT_TAG_SELECT: &str = "SELECT e.id, e.title, e.description, e.owner_id, \
     e.start_time, e.end_time, e.created_at, e.updated_at, \
     t.id AS tag_id, t.name AS tag_name \
     FROM events e \
     LEFT JOIN event_tags et ON et.event_id = e.id \
     LEFT JOIN tags t ON t.id = et.tag_id";

/// Folds join rows (ordered by event) into event records, attaching each
/// row's tag to the event it belongs to.
fn fold_rows(rows: Vec<EventTagRow>) -> Vec<EventRecord> {
    let mut events: Vec<EventRecord> = Vec::new();

    for row in rows {
        let event_id = EventId::from(row.id);
        let tag = match (row.tag_id, row.tag_name) {
            (Some(id), Some(name)) => Some(Tag {
                id: TagId::from(id),
                name,
            }),
            _ => None,
        };

        match events.last_mut() {
            Some(last) if last.id == event_id => {
                if let Some(tag) = tag {
                    last.tags.push(tag);
                }
            }
            _ => {
                events.push(EventRecord {
                    id: event_id,
                    title: row.title,
                    description: row.description,
                    owner: IdentityId::from(row.owner_id),
                    tags: tag.into_iter().collect(),
                    start_time: row.start_time,
                    end_time: row.end_time,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                });
            }
        }
    }

    events
}

pub struct PostgresEventRepository {
    pool: sqlx::PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    async fn link_tags(
        event: &EventRecord,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), EventRepositoryError> {
        for tag in &event.tags {
            sqlx::query("INSERT INTO event_tags (event_id, tag_id) VALUES ($1, $2)")
                .bind(event.id.as_uuid())
                .bind(tag.id.as_uuid())
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn insert(&self, event: &EventRecord) -> Result<(), EventRepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO events (id, title, description, owner_id, start_time, end_time, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(event.id.as_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.owner.as_uuid())
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await?;

        Self::link_tags(event, &mut tx).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn update(&self, event: &EventRecord) -> Result<(), EventRepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE events SET title = $2, description = $3, start_time = $4, end_time = $5, \
             updated_at = $6 WHERE id = $1",
        )
        .bind(event.id.as_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM event_tags WHERE event_id = $1")
            .bind(event.id.as_uuid())
            .execute(&mut *tx)
            .await?;

        Self::link_tags(event, &mut tx).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<EventRecord>, EventRepositoryError> {
        let sql = format!("{EVENT_TAG_SELECT} WHERE e.id = $1 ORDER BY t.name");
        let rows: Vec<EventTagRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(fold_rows(rows).into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<EventRecord>, EventRepositoryError> {
        let sql = format!("{EVENT_TAG_SELECT} ORDER BY e.created_at, e.id, t.name");
        let rows: Vec<EventTagRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(fold_rows(rows))
    }

    async fn delete(&self, id: EventId, owner: IdentityId) -> Result<(), EventRepositoryError> {
        // Tag links go with the event via ON DELETE CASCADE.
        sqlx::query("DELETE FROM events WHERE id = $1 AND owner_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_or_create_tag(&self, name: &str) -> Result<Tag, EventRepositoryError> {
        let existing: Option<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM tags WHERE LOWER(name) = LOWER($1)")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        if let Some((id, name)) = existing {
            return Ok(Tag {
                id: TagId::from(id),
                name,
            });
        }

        let fresh_id = TagId::random();
        let inserted: Option<(Uuid, String)> = sqlx::query_as(
            "INSERT INTO tags (id, name) VALUES ($1, $2) \
             ON CONFLICT ((LOWER(name))) DO NOTHING RETURNING id, name",
        )
        .bind(fresh_id.as_uuid())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some((id, name)) => Ok(Tag {
                id: TagId::from(id),
                name,
            }),
            // Lost the insert race; the winner's row is there to read.
            None => {
                let (id, name): (Uuid, String) =
                    sqlx::query_as("SELECT id, name FROM tags WHERE LOWER(name) = LOWER($1)")
                        .bind(name)
                        .fetch_one(&self.pool)
                        .await?;

                Ok(Tag {
                    id: TagId::from(id),
                    name,
                })
            }
        }
    }

    async fn count(&self) -> Result<u64, EventRepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}
