//! Payload model stored by cache backends.
//!
//! Entries are internally tagged JSON documents. The id key holds the full
//! store wrapped in a [`CachedStore`] envelope; the slug key holds a
//! [`SlugReference`] pointer and never the payload, so resolving by slug
//! always costs one extra id lookup.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::entities::StoreRecord;

/// Bumped when the envelope layout changes; readers treat unknown layouts
/// as misses.
pub const ENTRY_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreCacheEntry {
    Store(CachedStore),
    Reference(SlugReference),
}

/// Full store payload plus write-time metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedStore {
    #[serde(flatten)]
    pub store: StoreRecord,
    #[serde(with = "time::serde::rfc3339")]
    pub cached_at: OffsetDateTime,
    pub cache_version: String,
}

/// Pointer record stored under a slug key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlugReference {
    pub id: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl StoreCacheEntry {
    /// Envelope for the id-keyed entry.
    pub fn store(record: StoreRecord, now: OffsetDateTime) -> Self {
        Self::Store(CachedStore {
            store: record,
            cached_at: now,
            cache_version: ENTRY_VERSION.to_string(),
        })
    }

    /// Pointer for the slug-keyed entry.
    pub fn reference(record: &StoreRecord, now: OffsetDateTime) -> Self {
        Self::Reference(SlugReference {
            id: record.id.clone(),
            name: record.name.clone(),
            updated_at: now,
        })
    }

    pub fn into_store(self) -> Option<StoreRecord> {
        match self {
            Self::Store(cached) => Some(cached.store),
            Self::Reference(_) => None,
        }
    }
}
