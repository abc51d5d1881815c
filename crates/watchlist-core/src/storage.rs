use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use watchlist_models::{Identity, StoredAccount};
use crate::error::Result;

/// Persistence collaborator behind the list store
///
/// Implementations only move whole records; exclusivity, dedup and
/// per-identity serialization are enforced by [`crate::ListStore`].
/// A `save` must either replace the previous record completely or leave
/// it untouched.
#[async_trait]
pub trait CollectionStorage: Send + Sync {
    fn backend_name(&self) -> &str;

    /// `None` when nothing is stored for the identity
    async fn load(&self, identity: &Identity) -> Result<Option<StoredAccount>>;

    async fn save(&self, account: &StoredAccount) -> Result<()>;

    /// Returns whether a record existed
    async fn delete(&self, identity: &Identity) -> Result<bool>;
}

/// Volatile storage for demo and offline identities
#[derive(Default)]
pub struct MemoryStorage {
    accounts: RwLock<HashMap<Identity, StoredAccount>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStorage for MemoryStorage {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn load(&self, identity: &Identity) -> Result<Option<StoredAccount>> {
        let accounts = self.accounts.read().await;
        let account = accounts.get(identity).cloned();
        debug!(
            "Memory storage {}: {}",
            if account.is_some() { "hit" } else { "miss" },
            identity
        );
        Ok(account)
    }

    async fn save(&self, account: &StoredAccount) -> Result<()> {
        self.accounts
            .write()
            .await
            .insert(account.identity.clone(), account.clone());
        Ok(())
    }

    async fn delete(&self, identity: &Identity) -> Result<bool> {
        Ok(self.accounts.write().await.remove(identity).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        let identity = Identity::new("demo");
        assert!(storage.load(&identity).await.unwrap().is_none());

        let account = StoredAccount::new(identity.clone(), Utc::now());
        storage.save(&account).await.unwrap();
        assert_eq!(storage.load(&identity).await.unwrap(), Some(account));

        assert!(storage.delete(&identity).await.unwrap());
        assert!(!storage.delete(&identity).await.unwrap());
    }
}
