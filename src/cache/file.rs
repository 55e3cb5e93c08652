//! Durable store cache: one JSON document per entry on local disk.
//!
//! Entries live until explicitly invalidated. Writes land under a
//! temporary name and are renamed into place only once the payload is
//! fully serialized, so a concurrent reader observes either a complete
//! document or none.

use std::path::{Path, PathBuf};

use metrics::counter;
use time::OffsetDateTime;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::StoreRecord;
use crate::domain::types::{IdentifierKind, StoreRef};

use super::backend::StoreCacheBackend;
use super::entry::StoreCacheEntry;
use super::error::CacheError;
use super::keys::{self, StoreKey};
use super::{METRIC_ERROR, METRIC_HIT, METRIC_MISS};

pub struct FileCacheBackend {
    directory: PathBuf,
}

impl FileCacheBackend {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry_path(&self, key: &StoreKey<'_>) -> PathBuf {
        self.directory.join(key.file_name())
    }

    async fn write_entry(
        &self,
        key: &StoreKey<'_>,
        entry: &StoreCacheEntry,
    ) -> Result<(), CacheError> {
        let body = serde_json::to_vec_pretty(entry)?;

        // Safe under concurrent creation.
        fs::create_dir_all(&self.directory).await?;

        let path = self.entry_path(key);
        let staging = self
            .directory
            .join(format!("{}.{}.tmp", key.file_name(), Uuid::new_v4().simple()));

        fs::write(&staging, &body).await?;
        fs::rename(&staging, &path).await?;
        Ok(())
    }

    async fn remove_entry(&self, key: &StoreKey<'_>) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait::async_trait]
impl StoreCacheBackend for FileCacheBackend {
    async fn get(&self, identifier: &str, kind: IdentifierKind) -> Option<StoreCacheEntry> {
        let key = StoreKey { kind, identifier };
        let path = self.entry_path(&key);

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                counter!(METRIC_MISS).increment(1);
                debug!(%kind, identifier, "store cache miss");
                return None;
            }
            Err(err) => {
                counter!(METRIC_ERROR).increment(1);
                warn!(%kind, identifier, error = %err, "store cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(entry) => {
                counter!(METRIC_HIT).increment(1);
                Some(entry)
            }
            Err(err) => {
                counter!(METRIC_ERROR).increment(1);
                warn!(%kind, identifier, error = %err, "undecodable store cache entry, treating as miss");
                None
            }
        }
    }

    async fn set(&self, store: &StoreRecord) -> Result<(), CacheError> {
        let now = OffsetDateTime::now_utc();

        let mut attempted = 1;
        let mut applied = 0;
        let mut first_error = None;

        let id_key = StoreKey::id(&store.id);
        match self
            .write_entry(&id_key, &StoreCacheEntry::store(store.clone(), now))
            .await
        {
            Ok(()) => applied += 1,
            Err(err) => first_error = Some(err),
        }

        if let Some(slug) = store.slug.as_deref() {
            attempted += 1;
            let slug_key = StoreKey::slug(slug);
            match self
                .write_entry(&slug_key, &StoreCacheEntry::reference(store, now))
                .await
            {
                Ok(()) => applied += 1,
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            None => {
                debug!(store_id = %store.id, "store cached on disk");
                Ok(())
            }
            Some(err) if applied == 0 => Err(err),
            Some(_) => Err(CacheError::Partial { attempted, applied }),
        }
    }

    async fn invalidate(&self, target: &StoreRef) -> Result<(), CacheError> {
        let mut attempted = 1;
        let mut applied = 0;
        let mut first_error = None;

        match self.remove_entry(&StoreKey::id(&target.id)).await {
            Ok(()) => applied += 1,
            Err(err) => first_error = Some(err),
        }

        if let Some(slug) = target.slug.as_deref() {
            attempted += 1;
            match self.remove_entry(&StoreKey::slug(slug)).await {
                Ok(()) => applied += 1,
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            None => Ok(()),
            Some(err) if applied == 0 => Err(err),
            Some(_) => Err(CacheError::Partial { attempted, applied }),
        }
    }

    async fn list_slugs(&self) -> Vec<String> {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to enumerate store cache directory");
                return Vec::new();
            }
        };

        let mut slugs = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let name = entry.file_name();
                    if let Some(slug) = name.to_str().and_then(keys::slug_from_file_name) {
                        slugs.push(slug.to_string());
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "failed to enumerate store cache directory");
                    break;
                }
            }
        }
        slugs
    }
}
