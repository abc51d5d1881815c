use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::{debug, info};
use watchlist_models::{Category, Identity, ItemRecord, ListCollection, RemoveTarget, StoredAccount};
use crate::error::{Result, WatchlistError};
use crate::normalize::normalize_payload;
use crate::storage::CollectionStorage;

/// Keyed store of list collections, one per identity
///
/// Every mutation runs load, mutate, persist while holding the identity's
/// write lock, so readers of that identity see either the state before or
/// the state after. Identities never share a lock, and a lock is dropped
/// from the map once no operation holds or awaits it.
pub struct ListStore {
    storage: Arc<dyn CollectionStorage>,
    locks: Mutex<HashMap<Identity, Arc<RwLock<()>>>>,
}

impl ListStore {
    pub fn new(storage: Arc<dyn CollectionStorage>) -> Self {
        Self {
            storage,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.storage.backend_name()
    }

    fn lock_for(&self, identity: &Identity) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(identity.clone())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    fn release(&self, identity: &Identity, lock: Arc<RwLock<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // One reference in the map plus ours: nobody else holds or awaits it.
        // Drop ours while the map is still locked.
        let idle = Arc::strong_count(&lock) == 2;
        drop(lock);
        if idle {
            locks.remove(identity);
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    async fn load_existing(&self, identity: &Identity) -> Result<StoredAccount> {
        self.storage
            .load(identity)
            .await?
            .ok_or_else(|| WatchlistError::IdentityNotFound(identity.to_string()))
    }

    /// Create the empty collection for an identity on first authentication
    ///
    /// Existing records are returned untouched.
    pub async fn register(&self, identity: &Identity, now: DateTime<Utc>) -> Result<StoredAccount> {
        if identity.is_empty() {
            return Err(WatchlistError::IdentityNotFound(identity.to_string()));
        }

        let lock = self.lock_for(identity);
        let guard = lock.write().await;
        let result = self.create_account(identity, now).await;
        drop(guard);
        self.release(identity, lock);
        result
    }

    async fn create_account(&self, identity: &Identity, now: DateTime<Utc>) -> Result<StoredAccount> {
        if let Some(existing) = self.storage.load(identity).await? {
            debug!("Identity {} already registered", identity);
            return Ok(existing);
        }

        let account = StoredAccount::new(identity.clone(), now);
        self.storage.save(&account).await?;
        info!("Registered identity {} ({})", identity, self.storage.backend_name());
        Ok(account)
    }

    /// Full stored record, including the creation time used for statistics
    pub async fn account(&self, identity: &Identity) -> Result<StoredAccount> {
        let lock = self.lock_for(identity);
        let guard = lock.read().await;
        let result = self.load_existing(identity).await;
        drop(guard);
        self.release(identity, lock);
        result
    }

    pub async fn get_all(&self, identity: &Identity) -> Result<ListCollection> {
        Ok(self.account(identity).await?.lists)
    }

    /// Normalize a raw payload and file it at the head of `category`
    pub async fn upsert(&self, identity: &Identity, category: Category, payload: &Value) -> Result<ListCollection> {
        let item = normalize_payload(payload)?;
        self.upsert_record(identity, category, item).await
    }

    /// File an already-normalized record at the head of `category`
    ///
    /// Every earlier occurrence of the id, in any list, is dropped first.
    pub async fn upsert_record(&self, identity: &Identity, category: Category, item: ItemRecord) -> Result<ListCollection> {
        if item.imdb_id.trim().is_empty() {
            return Err(WatchlistError::MissingIdentifier);
        }

        let lock = self.lock_for(identity);
        let guard = lock.write().await;
        let result = self.file_record(identity, category, item).await;
        drop(guard);
        self.release(identity, lock);
        result
    }

    async fn file_record(&self, identity: &Identity, category: Category, item: ItemRecord) -> Result<ListCollection> {
        let mut account = self.load_existing(identity).await?;
        let previous = account.lists.category_of(&item.imdb_id);
        let imdb_id = item.imdb_id.clone();
        account.lists.upsert(category, item);
        self.storage.save(&account).await?;

        match previous {
            Some(from) if from != category => {
                info!("Moved {} from {} to {} for {}", imdb_id, from, category, identity)
            }
            Some(_) => info!("Refreshed {} in {} for {}", imdb_id, category, identity),
            None => info!("Added {} to {} for {}", imdb_id, category, identity),
        }
        Ok(account.lists)
    }

    /// Remove an id from one list or from all of them
    ///
    /// Removing something that is not there is not an error.
    pub async fn remove(&self, identity: &Identity, target: RemoveTarget, imdb_id: &str) -> Result<ListCollection> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(WatchlistError::MissingIdentifier);
        }

        let lock = self.lock_for(identity);
        let guard = lock.write().await;
        let result = self.drop_record(identity, target, imdb_id).await;
        drop(guard);
        self.release(identity, lock);
        result
    }

    async fn drop_record(&self, identity: &Identity, target: RemoveTarget, imdb_id: &str) -> Result<ListCollection> {
        let mut account = self.load_existing(identity).await?;
        let removed = match target {
            RemoveTarget::All => account.lists.remove_everywhere(imdb_id),
            RemoveTarget::Only(category) => account.lists.remove_from(category, imdb_id),
        };

        if removed == 0 {
            debug!("Nothing to remove for {} in {} ({})", imdb_id, target, identity);
            return Ok(account.lists);
        }

        self.storage.save(&account).await?;
        info!("Removed {} from {} for {}", imdb_id, target, identity);
        Ok(account.lists)
    }

    pub async fn is_tracked(&self, identity: &Identity, imdb_id: &str) -> Result<bool> {
        Ok(self.category_of(identity, imdb_id).await?.is_some())
    }

    pub async fn category_of(&self, identity: &Identity, imdb_id: &str) -> Result<Option<Category>> {
        let lists = self.get_all(identity).await?;
        Ok(lists.category_of(imdb_id.trim()))
    }

    /// Drop the identity's record entirely
    pub async fn forget(&self, identity: &Identity) -> Result<bool> {
        let lock = self.lock_for(identity);
        let guard = lock.write().await;
        let result = self.storage.delete(identity).await;
        drop(guard);
        self.release(identity, lock);

        let existed = result?;
        if existed {
            info!("Deleted lists for {}", identity);
        }
        Ok(existed)
    }
}
