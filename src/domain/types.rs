//! Small value types shared across the crate.

use serde::{Deserialize, Serialize};

use crate::domain::entities::StoreRecord;

/// The two address spaces a store can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Id,
    Slug,
}

impl IdentifierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Slug => "slug",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names a store's cache entries without carrying the payload.
///
/// Invalidation callers sometimes only know the id (out-of-band deletes),
/// so the slug side is optional; an unknown slug simply leaves any slug
/// entry to expire or be overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRef {
    pub id: String,
    pub slug: Option<String>,
}

impl StoreRef {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: None,
        }
    }
}

impl From<&StoreRecord> for StoreRef {
    fn from(store: &StoreRecord) -> Self {
        Self {
            id: store.id.clone(),
            slug: store.slug.clone(),
        }
    }
}
