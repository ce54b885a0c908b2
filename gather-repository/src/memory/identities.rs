use std::sync::Arc;

use async_trait::async_trait;
use gather_shared::types::{Identity, IdentityId, UsernameKey};

use super::MemoryState;
use crate::{IdentityRepository, IdentityRepositoryError};

pub struct MemoryIdentityRepository {
    state: Arc<MemoryState>,
}

impl MemoryIdentityRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentityRepository {
    async fn insert(&self, identity: &Identity) -> Result<(), IdentityRepositoryError> {
        let key = identity.username.key();
        let mut identities = self.state.identities.write().unwrap();

        // Matches the unique index on LOWER(username).
        if identities.values().any(|i| i.username.key() == key) {
            return Err(IdentityRepositoryError::DuplicateUsername(key));
        }

        identities.insert(identity.id, identity.clone());
        Ok(())
    }

    async fn update(&self, identity: &Identity) -> Result<(), IdentityRepositoryError> {
        let key = identity.username.key();
        let mut identities = self.state.identities.write().unwrap();

        if identities
            .values()
            .any(|i| i.id != identity.id && i.username.key() == key)
        {
            return Err(IdentityRepositoryError::DuplicateUsername(key));
        }

        if identities.contains_key(&identity.id) {
            identities.insert(identity.id, identity.clone());
        }
        Ok(())
    }

    async fn find_by_username(
        &self,
        key: &UsernameKey,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let identities = self.state.identities.read().unwrap();
        Ok(identities
            .values()
            .find(|i| i.username.key() == *key)
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let identities = self.state.identities.read().unwrap();
        Ok(identities.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, IdentityRepositoryError> {
        let identities = self.state.identities.read().unwrap();
        Ok(identities.len() as u64)
    }
}
