//! Store resolution: cache-first reads and write-through refresh.

use std::sync::Arc;

use metrics::counter;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::{
    CreateStoreParams, StoresRepo, StoresWriteRepo, UpdateStoreParams,
};
use crate::cache::{StoreCacheBackend, StoreCacheEntry};
use crate::domain::entities::StoreRecord;
use crate::domain::error::DomainError;
use crate::domain::slug::{SlugLookupError, unique_store_slug};
use crate::domain::types::{IdentifierKind, StoreRef};

pub(crate) const METRIC_PARTIAL_WRITE: &str = "vetrina_store_cache_partial_write_total";

/// Read path for storefront rendering: answers "give me the store for this
/// id or slug" cache-first, with the relational store as fallback, and
/// keeps the cache correct across writes.
///
/// Dependencies are injected at construction; there is no process-wide
/// cache handle.
pub struct StoreService {
    cache: Arc<dyn StoreCacheBackend>,
    stores: Arc<dyn StoresRepo>,
}

impl StoreService {
    pub fn new(cache: Arc<dyn StoreCacheBackend>, stores: Arc<dyn StoresRepo>) -> Self {
        Self { cache, stores }
    }

    /// Resolve a store by identifier.
    ///
    /// Cache first; a slug hit yields a pointer record that is chased with
    /// one more cache read. Any miss along the way falls back to the
    /// relational store by the caller's original identifier, and a
    /// database hit repopulates the cache best-effort before returning.
    pub async fn resolve(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<StoreRecord, AppError> {
        if let Some(store) = self.resolve_cached(identifier, kind).await {
            return Ok(store);
        }

        let fetched = match kind {
            IdentifierKind::Id => self.stores.find_by_id(identifier).await?,
            IdentifierKind::Slug => self.stores.find_by_slug(identifier).await?,
        };

        let Some(store) = fetched else {
            return Err(AppError::NotFound);
        };

        self.populate(&store).await;
        Ok(store)
    }

    async fn resolve_cached(&self, identifier: &str, kind: IdentifierKind) -> Option<StoreRecord> {
        match self.cache.get(identifier, kind).await? {
            StoreCacheEntry::Store(cached) => Some(cached.store),
            StoreCacheEntry::Reference(reference) => {
                match self.cache.get(&reference.id, IdentifierKind::Id).await {
                    Some(StoreCacheEntry::Store(cached)) => Some(cached.store),
                    // A dangling reference is a miss, never a result.
                    Some(StoreCacheEntry::Reference(_)) | None => {
                        debug!(
                            %kind,
                            identifier,
                            id = %reference.id,
                            "slug reference points at a missing id entry, falling back"
                        );
                        None
                    }
                }
            }
        }
    }

    /// Drop both cache entries for `store`, then write the fresh record
    /// through so the very next read is a hit instead of a forced miss.
    ///
    /// Invalidate-before-write ordering closes the race where a concurrent
    /// reader repopulates the cache with the pre-update payload. Cache
    /// failures are logged and counted; the caller's own write has already
    /// succeeded and must not be failed retroactively.
    pub async fn invalidate_and_refresh(&self, store: &StoreRecord) {
        let target = StoreRef::from(store);
        if let Err(err) = self.cache.invalidate(&target).await {
            counter!(METRIC_PARTIAL_WRITE).increment(1);
            warn!(store_id = %store.id, error = %err, "store cache invalidation failed");
        }
        self.populate(store).await;
    }

    /// Remove a store's cache entries without re-populating, for deletion
    /// paths where no fresh record exists.
    pub async fn invalidate(&self, target: &StoreRef) {
        if let Err(err) = self.cache.invalidate(target).await {
            counter!(METRIC_PARTIAL_WRITE).increment(1);
            warn!(store_id = %target.id, error = %err, "store cache invalidation failed");
        }
    }

    /// Slugs currently present in the cache, for administrative
    /// enumeration.
    pub async fn cached_slugs(&self) -> Vec<String> {
        self.cache.list_slugs().await
    }

    async fn populate(&self, store: &StoreRecord) {
        if let Err(err) = self.cache.set(store).await {
            counter!(METRIC_PARTIAL_WRITE).increment(1);
            warn!(
                store_id = %store.id,
                error = %err,
                "store cache population failed; next read falls back to the database"
            );
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateStoreRequest {
    pub name: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub settings: Option<Value>,
}

/// Customization patch: `None` leaves a field untouched. `settings` is
/// merged into the current document key by key; `sections` replaces the
/// `sections` key wholesale.
#[derive(Debug, Clone, Default)]
pub struct UpdateStoreRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub theme: Option<String>,
    pub settings: Option<Value>,
    pub sections: Option<Value>,
}

/// Write path used by the admin and sync APIs. Every mutation refreshes
/// the cache before reporting success.
pub struct AdminStoreService {
    reads: Arc<dyn StoresRepo>,
    writes: Arc<dyn StoresWriteRepo>,
    resolution: Arc<StoreService>,
}

impl AdminStoreService {
    pub fn new(
        reads: Arc<dyn StoresRepo>,
        writes: Arc<dyn StoresWriteRepo>,
        resolution: Arc<StoreService>,
    ) -> Self {
        Self {
            reads,
            writes,
            resolution,
        }
    }

    /// Create a store, deriving a unique slug from its name.
    pub async fn create_store(&self, request: CreateStoreRequest) -> Result<StoreRecord, AppError> {
        if request.name.trim().is_empty() {
            return Err(DomainError::EmptyStoreName.into());
        }

        let slug = unique_store_slug(&request.name, |candidate| async move {
            self.reads
                .slug_exists(&candidate)
                .await
                .map(|exists| !exists)
        })
        .await
        .map_err(|err| match err {
            SlugLookupError::Slug(slug_err) => AppError::validation(slug_err.to_string()),
            SlugLookupError::Predicate(repo_err) => AppError::Repo(repo_err),
        })?;

        let store = self
            .writes
            .create_store(CreateStoreParams {
                id: Uuid::new_v4().to_string(),
                slug: Some(slug),
                name: request.name,
                description: request.description,
                theme: request.theme,
                settings: request.settings.unwrap_or_else(|| Value::Object(Map::new())),
            })
            .await?;

        self.resolution.invalidate_and_refresh(&store).await;
        Ok(store)
    }

    /// Apply a customization patch and refresh the cache.
    pub async fn update_store(
        &self,
        store_id: &str,
        request: UpdateStoreRequest,
    ) -> Result<StoreRecord, AppError> {
        let current = self
            .reads
            .find_by_id(store_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let settings = (request.settings.is_some() || request.sections.is_some()).then(|| {
            merge_settings(
                &current.settings,
                request.settings.as_ref(),
                request.sections.as_ref(),
            )
        });

        let updated = self
            .writes
            .update_store(UpdateStoreParams {
                id: store_id.to_string(),
                name: request.name,
                description: request.description,
                logo: request.logo,
                banner: request.banner,
                theme: request.theme,
                settings,
            })
            .await
            .map_err(|err| match err {
                crate::application::repos::RepoError::NotFound => AppError::NotFound,
                other => AppError::Repo(other),
            })?;

        self.resolution.invalidate_and_refresh(&updated).await;
        Ok(updated)
    }
}

/// Merge a settings patch into the current document: top-level keys from
/// the patch win, everything else carries over, and `sections` (the UI
/// layout list) is replaced as a unit when provided.
fn merge_settings(current: &Value, patch: Option<&Value>, sections: Option<&Value>) -> Value {
    let mut merged = match current {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    if let Some(Value::Object(incoming)) = patch {
        for (key, value) in incoming {
            merged.insert(key.clone(), value.clone());
        }
    }

    if let Some(sections) = sections {
        merged.insert("sections".to_string(), sections.clone());
    }

    Value::Object(merged)
}
