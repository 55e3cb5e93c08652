//! Store cache subsystem.
//!
//! Two interchangeable backends sit behind [`StoreCacheBackend`]:
//!
//! - **Redis** (ephemeral): entries expire after a configurable TTL and
//!   multi-key writes are pipelined into one round trip.
//! - **File** (durable): one JSON document per entry on local disk, living
//!   until explicitly invalidated; suited to single-process deployments.
//!
//! Both address entries by the store's durable id and by its human slug.
//! The slug side never holds the payload, only a pointer record, so slug
//! renames and aliases never rewrite the full store document.
//!
//! ## Configuration
//!
//! Backend choice and tuning come from `vetrina.toml`:
//!
//! ```toml
//! [cache]
//! backend = "redis"
//! ttl_seconds = 3600
//! redis_url = "redis://127.0.0.1:6379"
//! ```

mod backend;
mod config;
mod entry;
mod error;
mod file;
mod keys;
mod redis;

use std::sync::Arc;

pub(crate) const METRIC_HIT: &str = "vetrina_store_cache_hit_total";
pub(crate) const METRIC_MISS: &str = "vetrina_store_cache_miss_total";
pub(crate) const METRIC_ERROR: &str = "vetrina_store_cache_error_total";

pub use backend::StoreCacheBackend;
pub use config::{CacheBackendKind, CacheConfig};
pub use entry::{CachedStore, SlugReference, StoreCacheEntry};
pub use error::CacheError;
pub use file::FileCacheBackend;
pub use keys::StoreKey;

pub use self::redis::RedisCacheBackend;

/// Construct the backend selected by `config`.
///
/// Redis connects eagerly so a bad URL fails at startup; the file backend
/// defers directory creation to the first write.
pub async fn connect_backend(
    config: &CacheConfig,
) -> Result<Arc<dyn StoreCacheBackend>, CacheError> {
    match config.backend {
        CacheBackendKind::Redis => Ok(Arc::new(RedisCacheBackend::connect(config).await?)),
        CacheBackendKind::File => Ok(Arc::new(FileCacheBackend::new(config.directory.clone()))),
    }
}
