use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of an identity (a registered account).
///
/// Opaque and immutable for the lifetime of the identity; usernames may be
/// renamed, ids never change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IdentityId(Uuid);

impl IdentityId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID (storage bindings).
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for IdentityId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID (storage bindings).
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for EventId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of a tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TagId(Uuid);

impl TagId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID (storage bindings).
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for TagId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
