//! Configuration layer: typed settings with layered precedence
//! (default file → local file → explicit file → environment).

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::cache::CacheBackendKind;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "vetrina";
const ENV_PREFIX: &str = "VETRINA";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_CACHE_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_OP_TIMEOUT_MILLIS: u64 = 2000;
const DEFAULT_CACHE_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_CACHE_DIRECTORY: &str = "static-stores";

/// Fully-resolved deployment settings after precedence resolution and
/// validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackendKind,
    pub ttl_seconds: u64,
    pub redis_url: Option<String>,
    pub connect_timeout_seconds: u64,
    pub op_timeout_millis: u64,
    pub retry_attempts: u32,
    pub directory: PathBuf,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence. `config_file`, when
/// provided, is required to exist; the default and local files are not.
pub fn load(config_file: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    cache: RawCacheSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    backend: Option<String>,
    ttl_seconds: Option<u64>,
    redis_url: Option<String>,
    connect_timeout_seconds: Option<u64>,
    op_timeout_millis: Option<u64>,
    retry_attempts: Option<u32>,
    directory: Option<PathBuf>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            database,
            cache,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            cache: build_cache_settings(cache)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let max_connections = database
        .max_connections
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
    let max_connections = NonZeroU32::new(max_connections).ok_or_else(|| {
        LoadError::invalid("database.max_connections", "must be greater than zero")
    })?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let backend = match cache.backend.as_deref() {
        None | Some("file") => CacheBackendKind::File,
        Some("redis") => CacheBackendKind::Redis,
        Some(other) => {
            return Err(LoadError::invalid(
                "cache.backend",
                format!("expected `redis` or `file`, got `{other}`"),
            ));
        }
    };

    let ttl_seconds = cache.ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS);
    if ttl_seconds == 0 {
        return Err(LoadError::invalid(
            "cache.ttl_seconds",
            "must be greater than zero",
        ));
    }

    let op_timeout_millis = cache
        .op_timeout_millis
        .unwrap_or(DEFAULT_CACHE_OP_TIMEOUT_MILLIS);
    if op_timeout_millis == 0 {
        return Err(LoadError::invalid(
            "cache.op_timeout_millis",
            "must be greater than zero",
        ));
    }

    let redis_url = cache.redis_url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    if let Some(url) = redis_url.as_deref() {
        let parsed = Url::parse(url)
            .map_err(|err| LoadError::invalid("cache.redis_url", err.to_string()))?;
        if !matches!(parsed.scheme(), "redis" | "rediss") {
            return Err(LoadError::invalid(
                "cache.redis_url",
                format!("unsupported scheme `{}`", parsed.scheme()),
            ));
        }
    }

    if backend == CacheBackendKind::Redis && redis_url.is_none() {
        return Err(LoadError::invalid(
            "cache.redis_url",
            "required when cache.backend is `redis`",
        ));
    }

    Ok(CacheSettings {
        backend,
        ttl_seconds,
        redis_url,
        connect_timeout_seconds: cache
            .connect_timeout_seconds
            .unwrap_or(DEFAULT_CACHE_CONNECT_TIMEOUT_SECS),
        op_timeout_millis,
        retry_attempts: cache.retry_attempts.unwrap_or(DEFAULT_CACHE_RETRY_ATTEMPTS),
        directory: cache
            .directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIRECTORY)),
    })
}
