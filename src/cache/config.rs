//! Cache backend configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TTL_SECS: u64 = 3600;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_OP_TIMEOUT_MILLIS: u64 = 2000;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_STEP_MILLIS: u64 = 50;
const DEFAULT_BACKOFF_CAP_MILLIS: u64 = 2000;
const DEFAULT_DIRECTORY: &str = "static-stores";

/// Which backend implementation to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// Ephemeral shared store with per-entry TTL.
    Redis,
    /// Durable one-file-per-entry store, no expiry.
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    /// Entry lifetime for the Redis backend; the file backend ignores it.
    pub ttl_seconds: u64,
    pub redis_url: Option<String>,
    pub connect_timeout_seconds: u64,
    /// Per-operation deadline. A timed-out cache call degrades to a miss,
    /// never to a request failure.
    pub op_timeout_millis: u64,
    pub retry_attempts: u32,
    /// Base directory for the file backend.
    pub directory: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::File,
            ttl_seconds: DEFAULT_TTL_SECS,
            redis_url: None,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECS,
            op_timeout_millis: DEFAULT_OP_TIMEOUT_MILLIS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            directory: PathBuf::from(DEFAULT_DIRECTORY),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_millis)
    }

    /// Linear backoff capped at two seconds, matching the retry strategy
    /// the original shared cache client used.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let millis = (u64::from(attempt) * DEFAULT_BACKOFF_STEP_MILLIS).min(DEFAULT_BACKOFF_CAP_MILLIS);
        Duration::from_millis(millis)
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            backend: settings.backend,
            ttl_seconds: settings.ttl_seconds,
            redis_url: settings.redis_url.clone(),
            connect_timeout_seconds: settings.connect_timeout_seconds,
            op_timeout_millis: settings.op_timeout_millis,
            retry_attempts: settings.retry_attempts,
            directory: settings.directory.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, CacheBackendKind::File);
        assert_eq!(config.ttl_seconds, 3600);
        assert_eq!(config.connect_timeout_seconds, 10);
        assert_eq!(config.op_timeout_millis, 2000);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.directory, PathBuf::from("static-stores"));
    }

    #[test]
    fn backoff_grows_linearly_then_caps() {
        let config = CacheConfig::default();
        assert_eq!(config.backoff(1), Duration::from_millis(50));
        assert_eq!(config.backoff(3), Duration::from_millis(150));
        assert_eq!(config.backoff(1000), Duration::from_millis(2000));
    }
}
