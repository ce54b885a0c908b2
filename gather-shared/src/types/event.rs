use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EventId, IdentityId, TagId};

/// A label attached to events.
///
/// Tag names are unique case-insensitively; "Online" and "online" resolve
/// to the same tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// A published event.
///
/// Anyone may list events; only the owner may change or delete one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub owner: IdentityId,
    pub tags: Vec<Tag>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating or updating an event.
///
/// Tags are given by name and resolved (or created) case-insensitively at
/// write time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}
