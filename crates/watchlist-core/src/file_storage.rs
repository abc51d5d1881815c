use async_trait::async_trait;
use bincode::{deserialize, serialize};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use watchlist_config::StorageFormat;
use watchlist_models::{Identity, StoredAccount};
use crate::error::{Result, WatchlistError};
use crate::normalize::normalize_stored_account;
use crate::storage::CollectionStorage;

/// One file per identity under the lists directory
///
/// JSON records are pretty-printed and read leniently through the
/// normalizer; binary records are bincode with gzip compression. Writes go
/// to a temp file that is renamed over the previous record.
pub struct FileStorage {
    lists_dir: PathBuf,
    format: StorageFormat,
}

impl FileStorage {
    pub fn new(lists_dir: &Path, format: StorageFormat) -> Result<Self> {
        std::fs::create_dir_all(lists_dir)?;
        Ok(Self {
            lists_dir: lists_dir.to_path_buf(),
            format,
        })
    }

    pub fn format(&self) -> StorageFormat {
        self.format
    }

    fn extension(&self) -> &'static str {
        match self.format {
            StorageFormat::Json => "json",
            StorageFormat::Binary => "bin",
        }
    }

    /// Identities are opaque, so they are percent-encoded and prefixed to keep
    /// names like ".." or "a/b" inside the lists directory
    pub fn account_path(&self, identity: &Identity) -> PathBuf {
        self.lists_dir.join(format!(
            "u_{}.{}",
            urlencoding::encode(identity.as_str()),
            self.extension()
        ))
    }

    /// Delete every account record (and leftover temp file) in the lists
    /// directory, in either format. Files this storage did not write stay.
    pub async fn delete_all(&self) -> Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.lists_dir).await?;
        let mut deleted = 0;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() || !is_account_file(&path) {
                continue;
            }
            tokio::fs::remove_file(&path).await?;
            debug!("Deleted {:?}", path);
            deleted += 1;
        }

        info!("Deleted {} account record(s) from {:?}", deleted, self.lists_dir);
        Ok(deleted)
    }

    fn encode(&self, account: &StoredAccount) -> Result<Vec<u8>> {
        match self.format {
            StorageFormat::Json => serde_json::to_vec_pretty(account).map_err(|e| {
                WatchlistError::InvalidCollection(format!("failed to serialize {}: {}", account.identity, e))
            }),
            StorageFormat::Binary => {
                let serialized = serialize(account).map_err(|e| {
                    WatchlistError::InvalidCollection(format!("failed to serialize {}: {}", account.identity, e))
                })?;
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&serialized)?;
                Ok(encoder.finish()?)
            }
        }
    }

    fn decode(&self, identity: &Identity, data: &[u8]) -> Result<StoredAccount> {
        match self.format {
            StorageFormat::Json => {
                let document: serde_json::Value = serde_json::from_slice(data).map_err(|e| {
                    WatchlistError::InvalidCollection(format!("record for {} is not valid JSON: {}", identity, e))
                })?;
                normalize_stored_account(identity, &document)
            }
            StorageFormat::Binary => {
                let mut decoder = GzDecoder::new(data);
                let mut decompressed = Vec::new();
                decoder.read_to_end(&mut decompressed).map_err(|e| {
                    WatchlistError::InvalidCollection(format!("record for {} is not valid gzip: {}", identity, e))
                })?;
                let account: StoredAccount = deserialize(&decompressed).map_err(|e| {
                    WatchlistError::InvalidCollection(format!("record for {} failed to decode: {}", identity, e))
                })?;
                if &account.identity != identity {
                    return Err(WatchlistError::InvalidCollection(format!(
                        "record for {} is filed under identity {}",
                        identity, account.identity
                    )));
                }
                Ok(account)
            }
        }
    }
}

fn is_account_file(path: &Path) -> bool {
    let named = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("u_"));
    let known = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("json" | "bin" | "tmp")
    );
    named && known
}

#[async_trait]
impl CollectionStorage for FileStorage {
    fn backend_name(&self) -> &str {
        match self.format {
            StorageFormat::Json => "file (json)",
            StorageFormat::Binary => "file (binary)",
        }
    }

    async fn load(&self, identity: &Identity) -> Result<Option<StoredAccount>> {
        let path = self.account_path(identity);

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Lists miss: {} (file does not exist)", identity);
                return Ok(None);
            }
            Err(e) => {
                warn!("Failed to read lists file for {}: {}", identity, e);
                return Err(e.into());
            }
        };

        match self.decode(identity, &data) {
            Ok(account) => {
                debug!("Lists hit: {} (loaded {} items)", identity, account.lists.len());
                Ok(Some(account))
            }
            Err(e) => {
                error!("Corrupted lists file {:?}: {}", path, e);
                Err(e)
            }
        }
    }

    async fn save(&self, account: &StoredAccount) -> Result<()> {
        let path = self.account_path(&account.identity);
        let encoded = self.encode(account)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        if let Err(e) = tokio::fs::write(&temp_path, encoded).await {
            warn!("Failed to write lists file for {}: {}", account.identity, e);
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            warn!("Failed to replace lists file for {}: {}", account.identity, e);
            if let Err(rm_err) = tokio::fs::remove_file(&temp_path).await {
                warn!("Failed to delete temp lists file: {}", rm_err);
            }
            return Err(e.into());
        }

        debug!("Lists saved: {} ({} items)", account.identity, account.lists.len());
        Ok(())
    }

    async fn delete(&self, identity: &Identity) -> Result<bool> {
        let path = self.account_path(identity);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted lists file for {}: {:?}", identity, path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
