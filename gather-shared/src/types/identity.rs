use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::IdentityId;

/// A username exactly as the account holder entered it.
///
/// Display casing is preserved; uniqueness and lookups are case-insensitive
/// (see [`UsernameKey`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The normalized key this username is stored and looked up under.
    pub fn key(&self) -> UsernameKey {
        UsernameKey::new(&self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-insensitive natural key for username uniqueness and lookups.
///
/// "Alice" and "ALICE" name the same account; every store query and cache
/// entry is keyed by this type rather than a raw string, so display-case
/// variants can never alias into distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsernameKey(String);

impl UsernameKey {
    pub fn new(value: &str) -> Self {
        Self(value.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UsernameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque one-way password verification secret.
///
/// Only a hashing strategy may produce or interpret the inner value. The
/// `Debug` impl is redacted so digests never leak through logs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// A registered account.
///
/// `email` is a private field: the authorization layer only releases it to
/// the identity itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub username: Username,
    pub email: String,
    pub password_digest: PasswordDigest,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
