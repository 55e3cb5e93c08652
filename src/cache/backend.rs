//! The polymorphic cache capability both backends implement.

use async_trait::async_trait;

use crate::domain::entities::StoreRecord;
use crate::domain::types::{IdentifierKind, StoreRef};

use super::entry::StoreCacheEntry;
use super::error::CacheError;

/// Key/value surface shared by the ephemeral Redis store and the durable
/// file store.
///
/// The cache is always allowed to miss. `get` therefore never fails:
/// backend errors are logged, counted, and collapsed into `None`, and the
/// caller falls back to the relational store. Write failures are reported
/// so callers can log or retry, but they are never grounds for failing the
/// caller's own write path.
#[async_trait]
pub trait StoreCacheBackend: Send + Sync {
    /// Look up an entry by identifier in the given address space.
    async fn get(&self, identifier: &str, kind: IdentifierKind) -> Option<StoreCacheEntry>;

    /// Write the id entry and, when the store has a slug, the slug
    /// reference. Both writes are attempted even when one fails.
    async fn set(&self, store: &StoreRecord) -> Result<(), CacheError>;

    /// Remove whichever of the two entries exist. Idempotent: invalidating
    /// an absent entry is not an error.
    async fn invalidate(&self, target: &StoreRef) -> Result<(), CacheError>;

    /// Enumerate the currently cached slugs, for administrative use.
    ///
    /// The listing may race concurrent writes; failures degrade to an
    /// empty list with a logged warning.
    async fn list_slugs(&self) -> Vec<String>;
}
