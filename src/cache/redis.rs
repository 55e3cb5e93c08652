//! Ephemeral store cache backed by a shared Redis instance.
//!
//! Entries expire after the configured TTL; expiry is enforced by the
//! server, not swept here. The two writes of a `set` (and the two deletes
//! of an `invalidate`) travel in one pipeline to save a round trip, but
//! Redis does not make them visible to other readers atomically; a reader
//! can briefly observe one entry without the other. That window is bounded
//! by a single round trip and is accepted.

use metrics::counter;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Pipeline};
use time::OffsetDateTime;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::domain::entities::StoreRecord;
use crate::domain::types::{IdentifierKind, StoreRef};

use super::backend::StoreCacheBackend;
use super::config::CacheConfig;
use super::entry::StoreCacheEntry;
use super::error::CacheError;
use super::keys::{self, SLUG_KEY_PATTERN, StoreKey};
use super::{METRIC_ERROR, METRIC_HIT, METRIC_MISS};

pub struct RedisCacheBackend {
    connection: ConnectionManager,
    config: CacheConfig,
}

impl RedisCacheBackend {
    /// Connect eagerly so a bad URL or unreachable server fails at
    /// startup. Once connected, the manager reconnects on its own and
    /// individual operations degrade to misses while the server is away.
    pub async fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let url = config
            .redis_url
            .as_deref()
            .ok_or_else(|| CacheError::Unavailable("cache.redis_url is not configured".into()))?;

        let client =
            Client::open(url).map_err(|err| CacheError::Unavailable(err.to_string()))?;

        let connection = timeout(config.connect_timeout(), ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(config.connect_timeout()))?
            .map_err(|err| CacheError::Unavailable(err.to_string()))?;

        Ok(Self {
            connection,
            config: config.clone(),
        })
    }

    /// Fetch one raw entry, retrying transport errors with linear backoff.
    /// Deadline overruns are not retried; stacking waits on a slow server
    /// would hold up the request this cache exists to speed up.
    async fn fetch_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let mut conn = self.connection.clone();
            match timeout(self.config.op_timeout(), conn.get::<_, Option<String>>(key)).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => {
                    if attempt >= self.config.retry_attempts.max(1) {
                        return Err(CacheError::Unavailable(err.to_string()));
                    }
                    sleep(self.config.backoff(attempt)).await;
                }
                Err(_) => return Err(CacheError::Timeout(self.config.op_timeout())),
            }
        }
    }

    async fn exec_pipeline(&self, pipe: &Pipeline) -> Result<(), CacheError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let mut conn = self.connection.clone();
            let call = async {
                let () = pipe.query_async(&mut conn).await?;
                Ok::<_, redis::RedisError>(())
            };
            match timeout(self.config.op_timeout(), call).await {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(err)) => {
                    if attempt >= self.config.retry_attempts.max(1) {
                        return Err(CacheError::Unavailable(err.to_string()));
                    }
                    sleep(self.config.backoff(attempt)).await;
                }
                Err(_) => return Err(CacheError::Timeout(self.config.op_timeout())),
            }
        }
    }
}

#[async_trait::async_trait]
impl StoreCacheBackend for RedisCacheBackend {
    async fn get(&self, identifier: &str, kind: IdentifierKind) -> Option<StoreCacheEntry> {
        let key = StoreKey { kind, identifier }.redis_key();

        let raw = match self.fetch_raw(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
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

        match serde_json::from_str(&raw) {
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
        let ttl = self.config.ttl_seconds;

        let id_key = StoreKey::id(&store.id).redis_key();
        let payload = serde_json::to_string(&StoreCacheEntry::store(store.clone(), now))?;

        let mut pipe = redis::pipe();
        pipe.set_ex(&id_key, payload, ttl);

        if let Some(slug) = store.slug.as_deref() {
            let slug_key = StoreKey::slug(slug).redis_key();
            let reference = serde_json::to_string(&StoreCacheEntry::reference(store, now))?;
            pipe.set_ex(&slug_key, reference, ttl);
        }

        self.exec_pipeline(&pipe).await?;
        debug!(store_id = %store.id, ttl_seconds = ttl, "store cached");
        Ok(())
    }

    async fn invalidate(&self, target: &StoreRef) -> Result<(), CacheError> {
        let mut pipe = redis::pipe();
        pipe.del(StoreKey::id(&target.id).redis_key());
        if let Some(slug) = target.slug.as_deref() {
            pipe.del(StoreKey::slug(slug).redis_key());
        }

        self.exec_pipeline(&pipe).await?;
        debug!(store_id = %target.id, "store cache invalidated");
        Ok(())
    }

    async fn list_slugs(&self) -> Vec<String> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let mut conn = self.connection.clone();
            match timeout(
                self.config.op_timeout(),
                conn.keys::<_, Vec<String>>(SLUG_KEY_PATTERN),
            )
            .await
            {
                Ok(Ok(found)) => {
                    return found
                        .iter()
                        .filter_map(|key| keys::slug_from_redis_key(key))
                        .map(str::to_string)
                        .collect();
                }
                Ok(Err(err)) => {
                    if attempt >= self.config.retry_attempts.max(1) {
                        warn!(error = %err, "failed to enumerate cached store slugs");
                        return Vec::new();
                    }
                    sleep(self.config.backoff(attempt)).await;
                }
                Err(_) => {
                    warn!("timed out enumerating cached store slugs");
                    return Vec::new();
                }
            }
        }
    }
}
