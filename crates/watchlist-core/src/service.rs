use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use watchlist_config::{Config, PathManager, StorageBackend};
use watchlist_models::{Category, Identity, ListCollection, RemoveTarget, StatisticsSnapshot, StoredAccount};
use crate::error::Result;
use crate::file_storage::FileStorage;
use crate::stats::Aggregator;
use crate::storage::{CollectionStorage, MemoryStorage};
use crate::store::ListStore;

/// Query surface handed to the surrounding service
///
/// Categories arrive as plain strings and are checked here before the
/// store is touched.
pub struct WatchlistService {
    store: ListStore,
    aggregator: Aggregator,
}

impl WatchlistService {
    pub fn new(storage: Arc<dyn CollectionStorage>, aggregator: Aggregator) -> Self {
        Self {
            store: ListStore::new(storage),
            aggregator,
        }
    }

    /// Volatile service, nothing outlives the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Aggregator::default())
    }

    pub fn from_config(config: &Config, paths: &PathManager) -> anyhow::Result<Self> {
        let storage: Arc<dyn CollectionStorage> = match config.storage.backend {
            StorageBackend::File => {
                let lists_dir = config
                    .storage
                    .data_dir
                    .clone()
                    .unwrap_or_else(|| paths.lists_dir());
                debug!("Using lists directory {:?}", lists_dir);
                Arc::new(FileStorage::new(&lists_dir, config.storage.format)?)
            }
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };

        info!("Watchlist storage: {}", storage.backend_name());
        Ok(Self::new(storage, Aggregator::new(config.stats.top_years)))
    }

    pub fn backend_name(&self) -> &str {
        self.store.backend_name()
    }

    pub async fn register(&self, identity: &Identity) -> Result<StoredAccount> {
        self.store.register(identity, Utc::now()).await
    }

    pub async fn list_all(&self, identity: &Identity) -> Result<ListCollection> {
        self.store.get_all(identity).await
    }

    pub async fn list_upsert(&self, identity: &Identity, category: &str, payload: &Value) -> Result<ListCollection> {
        let category: Category = category.parse()?;
        self.store.upsert(identity, category, payload).await
    }

    /// `target` is a category name or `"all"`
    pub async fn list_remove(&self, identity: &Identity, target: &str, imdb_id: &str) -> Result<ListCollection> {
        let target: RemoveTarget = target.parse()?;
        self.store.remove(identity, target, imdb_id).await
    }

    pub async fn stats_get(&self, identity: &Identity) -> Result<StatisticsSnapshot> {
        let account = self.store.account(identity).await?;
        self.aggregator
            .aggregate(&account.lists, account.created_at, Utc::now())
    }

    pub async fn is_tracked(&self, identity: &Identity, imdb_id: &str) -> Result<bool> {
        self.store.is_tracked(identity, imdb_id).await
    }

    pub async fn category_of(&self, identity: &Identity, imdb_id: &str) -> Result<Option<Category>> {
        self.store.category_of(identity, imdb_id).await
    }

    /// Delete everything stored for the identity
    pub async fn forget(&self, identity: &Identity) -> Result<bool> {
        self.store.forget(identity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchlistError;
    use serde_json::json;
    use tempfile::TempDir;
    use watchlist_config::StorageFormat;

    async fn service_with(name: &str) -> (WatchlistService, Identity) {
        let service = WatchlistService::in_memory();
        let identity = Identity::new(name);
        service.register(&identity).await.unwrap();
        (service, identity)
    }

    #[tokio::test]
    async fn test_invalid_category_rejected_before_store() {
        let (service, identity) = service_with("alice").await;

        let result = service
            .list_upsert(&identity, "favorites", &json!({ "imdbId": "tt1" }))
            .await;
        assert!(matches!(result, Err(WatchlistError::InvalidCategory(ref c)) if c == "favorites"));

        // "all" only exists for removal
        let result = service.list_upsert(&identity, "all", &json!({ "imdbId": "tt1" })).await;
        assert!(matches!(result, Err(WatchlistError::InvalidCategory(_))));

        let result = service.list_remove(&identity, "seen", "tt1").await;
        assert!(matches!(result, Err(WatchlistError::InvalidCategory(_))));

        assert!(service.list_all(&identity).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_category_wins_over_missing_identity() {
        let service = WatchlistService::in_memory();
        let result = service
            .list_upsert(&Identity::new("ghost"), "nope", &json!({ "imdbId": "tt1" }))
            .await;
        assert!(matches!(result, Err(WatchlistError::InvalidCategory(_))));
    }

    #[tokio::test]
    async fn test_upsert_remove_round() {
        let (service, identity) = service_with("alice").await;

        let lists = service
            .list_upsert(&identity, "planned", &json!({ "imdbID": "tt0111161", "title": "The Shawshank Redemption" }))
            .await
            .unwrap();
        assert_eq!(lists.planned[0].title, "The Shawshank Redemption");
        assert_eq!(service.category_of(&identity, "tt0111161").await.unwrap(), Some(Category::Planned));

        let lists = service.list_remove(&identity, "all", "tt0111161").await.unwrap();
        assert!(lists.is_empty());
        assert!(!service.is_tracked(&identity, "tt0111161").await.unwrap());
    }

    #[tokio::test]
    async fn test_stats_get() {
        let (service, identity) = service_with("alice").await;
        service
            .list_upsert(
                &identity,
                "watched",
                &json!({ "imdbId": "tt1", "runtime": "120 min", "rating": 8.5, "releaseDate": "2010-07-16" }),
            )
            .await
            .unwrap();
        service
            .list_upsert(&identity, "watched", &json!({ "imdbId": "tt2", "runtime": "1h 30m", "rating": null }))
            .await
            .unwrap();

        let stats = service.stats_get(&identity).await.unwrap();
        assert_eq!(stats.overview.watched_count, 2);
        assert_eq!(stats.overview.total_watch_time, 210);
        assert_eq!(stats.overview.average_rating, 8.5);
        assert_eq!(stats.overview.account_age, 0);
        assert_eq!(stats.overview.movies_this_month, 2);
    }

    #[tokio::test]
    async fn test_stats_for_unknown_identity() {
        let service = WatchlistService::in_memory();
        let result = service.stats_get(&Identity::new("ghost")).await;
        assert!(matches!(result, Err(WatchlistError::IdentityNotFound(_))));
    }

    #[tokio::test]
    async fn test_from_config_file_backend() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path());
        let mut config = Config::default();
        config.storage.format = StorageFormat::Binary;
        config.stats.top_years = 1;

        let identity = Identity::new("alice");
        {
            let service = WatchlistService::from_config(&config, &paths).unwrap();
            assert_eq!(service.backend_name(), "file (binary)");
            service.register(&identity).await.unwrap();
            for (id, year) in [("tt1", "1999"), ("tt2", "2004")] {
                service
                    .list_upsert(&identity, "dropped", &json!({ "imdbId": id, "releaseDate": year }))
                    .await
                    .unwrap();
            }
        }

        assert!(paths.lists_dir().join("u_alice.bin").exists());
        let service = WatchlistService::from_config(&config, &paths).unwrap();
        let stats = service.stats_get(&identity).await.unwrap();
        assert_eq!(stats.overview.dropped_count, 2);
        assert_eq!(stats.top_stats.most_common_years.len(), 1);
        assert_eq!(stats.top_stats.most_common_years[0].year, 2004);
    }

    #[tokio::test]
    async fn test_from_config_data_dir_override() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path().join("base"));
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().join("elsewhere"));

        let service = WatchlistService::from_config(&config, &paths).unwrap();
        service.register(&Identity::new("bob")).await.unwrap();
        assert!(dir.path().join("elsewhere").join("u_bob.json").exists());
        assert!(!paths.lists_dir().exists());
    }

    #[tokio::test]
    async fn test_from_config_memory_backend() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path());
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;

        let service = WatchlistService::from_config(&config, &paths).unwrap();
        assert_eq!(service.backend_name(), "memory");
        service.register(&Identity::new("demo")).await.unwrap();
        assert!(!paths.lists_dir().exists());
    }
}
