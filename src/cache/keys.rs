//! Cache key formatting for the two store address spaces.
//!
//! Redis keys follow `store:<kind>:<identifier>`; the durable backend uses
//! `<kind>-<identifier>.json` file names. Both are deterministic, so an
//! operator can inspect or delete individual entries by hand.

use crate::domain::types::IdentifierKind;

/// Redis pattern matching every slug entry.
pub const SLUG_KEY_PATTERN: &str = "store:slug:*";

const SLUG_KEY_PREFIX: &str = "store:slug:";
const SLUG_FILE_PREFIX: &str = "slug-";
const FILE_SUFFIX: &str = ".json";

/// A fully-qualified cache key for one store entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreKey<'a> {
    pub kind: IdentifierKind,
    pub identifier: &'a str,
}

impl<'a> StoreKey<'a> {
    pub fn id(identifier: &'a str) -> Self {
        Self {
            kind: IdentifierKind::Id,
            identifier,
        }
    }

    pub fn slug(identifier: &'a str) -> Self {
        Self {
            kind: IdentifierKind::Slug,
            identifier,
        }
    }

    /// Key in the shared Redis key space.
    pub fn redis_key(&self) -> String {
        format!("store:{}:{}", self.kind, self.identifier)
    }

    /// File name under the durable backend's directory.
    pub fn file_name(&self) -> String {
        format!("{}-{}{FILE_SUFFIX}", self.kind, self.identifier)
    }
}

/// Extract the slug from a Redis key, if it is a slug entry key.
pub fn slug_from_redis_key(key: &str) -> Option<&str> {
    key.strip_prefix(SLUG_KEY_PREFIX)
}

/// Extract the slug from a durable-backend file name, if it is a slug
/// entry file.
pub fn slug_from_file_name(name: &str) -> Option<&str> {
    name.strip_prefix(SLUG_FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)
}
